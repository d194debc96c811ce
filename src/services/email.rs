use crate::{config::email::EmailConfig, models::user::BanOutcome};
use anyhow::Result;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

/// Transactional notification dispatcher.
///
/// One method per lifecycle event; every caller sends from a spawned task
/// after its own transaction has committed, so a transport failure can only
/// ever be logged, never abort a state change.
#[derive(Clone)]
pub struct EmailService {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from_address: Option<String>,
    site_url: String,
}

impl EmailService {
    /// Build from environment variables. If SMTP is not configured, email
    /// sending is silently skipped (graceful degradation).
    pub fn from_env() -> Self {
        match EmailConfig::from_env() {
            Some(cfg) => {
                let creds = Credentials::new(cfg.smtp_username.clone(), cfg.smtp_password.clone());
                let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.smtp_host)
                    .map(|builder| builder.port(cfg.smtp_port).credentials(creds).build());

                match transport {
                    Ok(t) => Self {
                        transport: Some(t),
                        from_address: Some(cfg.from_address),
                        site_url: cfg.site_url,
                    },
                    Err(e) => {
                        tracing::warn!("Failed to build SMTP transport: {e}");
                        Self {
                            transport: None,
                            from_address: None,
                            site_url: cfg.site_url,
                        }
                    }
                }
            }
            None => {
                let site_url =
                    std::env::var("SITE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
                Self {
                    transport: None,
                    from_address: None,
                    site_url,
                }
            }
        }
    }

    /// Returns true if SMTP is configured and available.
    pub fn is_configured(&self) -> bool {
        self.transport.is_some()
    }

    pub async fn send_registration_confirmation(&self, to: &str, username: &str) -> Result<()> {
        self.send_email(
            to,
            "Registration confirmed",
            &templates::registration_confirmation(username),
        )
        .await
    }

    pub async fn send_password_reset(&self, to: &str, username: &str, token: &str) -> Result<()> {
        let link = format!("{}/reset-password?token={}", self.site_url, token);
        self.send_email(
            to,
            "Reset your password",
            &templates::password_reset(username, &link),
        )
        .await
    }

    pub async fn send_password_reset_success(&self, to: &str, username: &str) -> Result<()> {
        self.send_email(
            to,
            "Password reset confirmation",
            &templates::password_reset_success(username),
        )
        .await
    }

    pub async fn send_chat_request_received(&self, to: &str, username: &str) -> Result<()> {
        self.send_email(
            to,
            "Video chat request received",
            &templates::chat_request_received(username),
        )
        .await
    }

    pub async fn send_chat_request_alert(
        &self,
        to: &str,
        username: &str,
        requested_at: &str,
        attachment: Option<&str>,
    ) -> Result<()> {
        self.send_email(
            to,
            "New video chat request",
            &templates::chat_request_alert(username, requested_at, attachment),
        )
        .await
    }

    pub async fn send_chat_request_validated(
        &self,
        to: &str,
        username: &str,
        scheduled_at: &str,
        meeting_link: Option<&str>,
    ) -> Result<()> {
        self.send_email(
            to,
            "Video chat request accepted",
            &templates::chat_request_validated(username, scheduled_at, meeting_link),
        )
        .await
    }

    pub async fn send_chat_request_refused(&self, to: &str, username: &str) -> Result<()> {
        self.send_email(
            to,
            "Video chat request declined",
            &templates::chat_request_refused(username),
        )
        .await
    }

    pub async fn send_devis_received(&self, to: &str, first_name: &str) -> Result<()> {
        self.send_email(
            to,
            "Quote request received",
            &templates::devis_received(first_name),
        )
        .await
    }

    /// Send the notification matching a ban outcome. The subject/body pair is
    /// chosen by `templates::ban_notice`, so the selection itself is testable
    /// without a transport.
    pub async fn send_ban_notice(
        &self,
        outcome: BanOutcome,
        to: &str,
        username: &str,
    ) -> Result<()> {
        let (subject, body) = templates::ban_notice(outcome, username);
        self.send_email(to, subject, &body).await
    }

    pub async fn send_ban_lifted(&self, to: &str, username: &str) -> Result<()> {
        self.send_email(to, "Suspension lifted", &templates::ban_lifted(username))
            .await
    }

    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        let transport = match &self.transport {
            Some(t) => t,
            None => {
                tracing::debug!("SMTP not configured, skipping email to {to}");
                return Ok(());
            }
        };
        let from_address = match &self.from_address {
            Some(f) => f,
            None => return Ok(()),
        };

        let from_mailbox: Mailbox =
            from_address
                .parse()
                .map_err(|e: lettre::address::AddressError| {
                    anyhow::anyhow!("Invalid from address '{}': {}", from_address, e)
                })?;
        let to_mailbox: Mailbox = to.parse().map_err(|e: lettre::address::AddressError| {
            anyhow::anyhow!("Invalid to address '{}': {}", to, e)
        })?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        transport.send(email).await?;
        tracing::info!("Email sent to {to}: {subject}");
        Ok(())
    }
}

/// Plain-text message bodies, kept as pure functions so they stay testable
/// without a transport.
pub mod templates {
    use crate::models::user::BanOutcome;

    const SIGNATURE: &str = "Best regards,\nThe SethiarWorks team";

    /// Pick the subject/body pair for a ban outcome.
    pub fn ban_notice(outcome: BanOutcome, username: &str) -> (&'static str, String) {
        match outcome {
            BanOutcome::Temporary(_) => ("Account suspended", temporary_ban(username)),
            BanOutcome::Permanent => ("Account permanently banned", permanent_ban(username)),
        }
    }

    pub fn registration_confirmation(username: &str) -> String {
        format!(
            "Hello {username},\n\nThank you for registering on the SethiarWorks website. \
             Your registration has been confirmed.\n\nWe hope to see you again soon to shape \
             your project together.\n\n{SIGNATURE}"
        )
    }

    pub fn password_reset(username: &str, link: &str) -> String {
        format!(
            "Hello {username},\n\nTo reset your password, click the link below:\n\n{link}\n\n\
             This link expires in 1 hour. If you did not request this, you can safely ignore \
             this email.\n\n{SIGNATURE}"
        )
    }

    pub fn password_reset_success(username: &str) -> String {
        format!("Hello {username},\n\nYour password has been reset successfully.\n\n{SIGNATURE}")
    }

    pub fn chat_request_received(username: &str) -> String {
        format!(
            "Hello {username},\n\nWe have received your video chat request. You will be \
             notified as soon as it has been reviewed.\n\n{SIGNATURE}"
        )
    }

    pub fn chat_request_alert(
        username: &str,
        requested_at: &str,
        attachment: Option<&str>,
    ) -> String {
        let attachment_line = match attachment {
            Some(name) => format!("\nAttachment: {name}\n"),
            None => String::new(),
        };
        format!(
            "A new video chat request has been submitted.\n\nRequester: {username}\n\
             Requested slot: {requested_at}\n{attachment_line}\n\
             Please review it from the admin backend.\n\n{SIGNATURE}"
        )
    }

    pub fn chat_request_validated(
        username: &str,
        scheduled_at: &str,
        meeting_link: Option<&str>,
    ) -> String {
        let link_block = match meeting_link {
            Some(link) => format!("Join the meeting with this link:\n\n{link}\n"),
            None => "Your meeting link will be sent to you separately.\n".to_string(),
        };
        format!(
            "Hello {username},\n\nYour video chat request has been accepted for \
             {scheduled_at}.\n\n{link_block}\n{SIGNATURE}"
        )
    }

    pub fn chat_request_refused(username: &str) -> String {
        format!(
            "Hello {username},\n\nUnfortunately your video chat request could not be \
             accepted. Feel free to submit a new request with a different slot.\n\n{SIGNATURE}"
        )
    }

    pub fn devis_received(first_name: &str) -> String {
        format!(
            "Hello {first_name},\n\nWe have received your quote request and will come back \
             to you as soon as possible.\n\nThank you for your trust.\n\n{SIGNATURE}"
        )
    }

    pub fn temporary_ban(username: &str) -> String {
        format!(
            "Hello {username},\n\nFollowing a breach of the site rules, your account has \
             been suspended for one week. If the rules are broken again, your account will \
             be banned permanently.\n\n{SIGNATURE}"
        )
    }

    pub fn ban_lifted(username: &str) -> String {
        format!(
            "Hello {username},\n\nYour suspension from the SethiarWorks website has been \
             lifted. We hope to see you again soon.\n\n{SIGNATURE}"
        )
    }

    pub fn permanent_ban(username: &str) -> String {
        format!(
            "Hello {username},\n\nAs announced in a previous email, a repeated breach of \
             the site rules leads to a permanent ban. Receiving this email means your \
             account has now been banned permanently.\n\nWe regret this decision, but we \
             cannot tolerate this disregard of the established rules.\n\n{SIGNATURE}"
        )
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn validated_body_contains_link_and_slot() {
            let body = chat_request_validated(
                "Alice",
                "2025-06-01 14:00",
                Some("https://example.whereby.com/room"),
            );
            assert!(body.contains("Alice"));
            assert!(body.contains("2025-06-01 14:00"));
            assert!(body.contains("https://example.whereby.com/room"));
        }

        #[test]
        fn validated_body_without_link_has_fallback() {
            let body = chat_request_validated("Alice", "2025-06-01 14:00", None);
            assert!(body.contains("sent to you separately"));
            assert!(!body.contains("https://"));
        }

        #[test]
        fn alert_body_mentions_attachment_only_when_present() {
            let with = chat_request_alert("Bob", "2025-06-01 14:00", Some("brief.pdf"));
            assert!(with.contains("Attachment: brief.pdf"));

            let without = chat_request_alert("Bob", "2025-06-01 14:00", None);
            assert!(!without.contains("Attachment:"));
        }

        #[test]
        fn ban_bodies_are_distinct() {
            let temp = temporary_ban("Mallory");
            let perm = permanent_ban("Mallory");
            assert!(temp.contains("one week"));
            assert!(perm.contains("permanently"));
            assert_ne!(temp, perm);
        }

        #[test]
        fn ban_notice_escalates_on_second_offense() {
            use crate::models::user::ban_outcome;
            let now = chrono::NaiveDate::from_ymd_opt(2025, 6, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap();

            // First offense (count 0 -> 1): the temporary notice goes out.
            let (subject, body) = ban_notice(ban_outcome(0, now), "Mallory");
            assert_eq!(subject, "Account suspended");
            assert!(body.contains("one week"));

            // Second offense (count 1 -> 2): the permanent notice, not the
            // temporary one.
            let (subject, body) = ban_notice(ban_outcome(1, now), "Mallory");
            assert_eq!(subject, "Account permanently banned");
            assert!(body.contains("banned permanently"));
        }

        #[test]
        fn refused_body_invites_resubmission() {
            assert!(chat_request_refused("Alice").contains("new request"));
        }
    }
}
