use sqlx::SqliteConnection;

pub struct NewProgramInvite<'a> {
    pub invite_id: &'a str,
    pub program_id: &'a str,
    pub inviter_member_id: &'a str,
    pub email: &'a str,
}

const SQL_INSERT_INVITE: &str = r#"
INSERT INTO program_invites (
  invite_id,
  program_id,
  inviter_member_id,
  email,
  status
) VALUES (?1, ?2, ?3, ?4, 'pending')
"#;

pub async fn insert_invite(
    conn: &mut SqliteConnection,
    invite: NewProgramInvite<'_>,
) -> sqlx::Result<()> {
    sqlx::query(SQL_INSERT_INVITE)
        .bind(invite.invite_id)
        .bind(invite.program_id)
        .bind(invite.inviter_member_id)
        .bind(invite.email)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

const SQL_MARK_ACCEPTED: &str = r#"
UPDATE program_invites
SET status = 'accepted',
    updated_at = strftime('%Y-%m-%dT%H:%M:%f', 'now')
WHERE invite_id = ?1
"#;

pub async fn mark_accepted(conn: &mut SqliteConnection, invite_id: &str) -> sqlx::Result<()> {
    sqlx::query(SQL_MARK_ACCEPTED)
        .bind(invite_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

// Invites the member sent, plus invites addressed to any of their emails.
const SQL_PURGE_FOR_MEMBER: &str = r#"
DELETE FROM program_invites
WHERE inviter_member_id = ?1
   OR email IN (
     SELECT email
     FROM member_emails
     WHERE member_id = ?1
   )
"#;

pub async fn purge_for_member(conn: &mut SqliteConnection, member_id: &str) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_PURGE_FOR_MEMBER)
        .bind(member_id)
        .execute(&mut *conn)
        .await?;
    Ok(res.rows_affected())
}
