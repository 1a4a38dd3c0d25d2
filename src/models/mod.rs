pub mod health_logs;
pub mod invites;
pub mod members;
pub mod memberships;
pub mod notifications;
pub mod programs;
pub mod workouts;

pub use health_logs::HealthLogRow;
pub use invites::ProgramInviteRow;
pub use members::MemberRow;
pub use memberships::{MembershipRow, PromotionCandidateRow, ProgramMemberRow};
pub use notifications::NotificationFeedRow;
pub use programs::{ProgramRow, ProgramSummaryRow};
pub use workouts::WorkoutRow;
