use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{debug, instrument};

use crate::config::email::EmailConfig;
use crate::utils::errors::AppError;

/// Outbound notification channel used by the reminder scheduler.
///
/// Delivery failure is a recoverable `Err`, never a panic; callers decide
/// whether to retry or log and move on.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn send_lesson_reminder(
        &self,
        to_email: &str,
        first_name: &str,
        lesson_title: &str,
        starts_at: DateTime<Utc>,
        minutes_before: i64,
    ) -> Result<(), AppError>;
}

pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    #[instrument(skip(self))]
    pub async fn send_welcome_email(&self, to_email: &str, full_name: &str) -> Result<(), AppError> {
        let subject = format!("{} - Welcome to Your Timetable!", self.config.from_name);
        let body = "Thanks for signing up! Start organizing your schedule with ease.";
        let text_body = format!(
            "Hi {},\n\n{}\n\nGet started: {}\n",
            full_name, body, self.config.frontend_url
        );
        let html_body = self.branded_template(&subject, full_name, body, "Get Started");

        self.send_email(to_email, &subject, &text_body, &html_body)
            .await
    }

    #[instrument(skip(self))]
    pub async fn send_admin_notification(
        &self,
        new_user_email: &str,
        full_name: &str,
    ) -> Result<(), AppError> {
        let subject = format!("{} - New User Registered", self.config.from_name);
        let body = format!(
            "A new user just signed up: {} ({})",
            full_name, new_user_email
        );
        let text_body = format!("Hi Admin,\n\n{}\n", body);
        let html_body = self.branded_template(&subject, "Admin", &body, "Review Users");

        let admin_email = self.config.admin_email.clone();
        self.send_email(&admin_email, &subject, &text_body, &html_body)
            .await
    }

    #[instrument(skip(self, html_body, text_body))]
    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        if !self.config.enabled {
            debug!(to = %to_email, subject = %subject, "SMTP disabled, skipping email");
            return Ok(());
        }

        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| AppError::internal(anyhow::anyhow!("Invalid from email: {}", e)))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| AppError::internal(anyhow::anyhow!("Invalid to email: {}", e)))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to build email: {}", e)))?;

        let mailer = if self.config.smtp_username.is_empty() {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            );

            SmtpTransport::relay(&self.config.smtp_host)
                .map_err(|e| {
                    AppError::internal(anyhow::anyhow!("Failed to create SMTP relay: {}", e))
                })?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build()
        };

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::internal(anyhow::anyhow!("Task join error: {}", e)))?
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to send email: {}", e)))?;

        Ok(())
    }

    fn branded_template(
        &self,
        title: &str,
        greeting_name: &str,
        message: &str,
        action_text: &str,
    ) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
</head>
<body style="margin: 0; padding: 0; font-family: Arial, sans-serif; background-color: #f4f4f4;">
    <table width="100%" cellpadding="0" cellspacing="0" style="background-color: #f4f4f4; padding: 20px;">
        <tr>
            <td align="center">
                <table width="600" cellpadding="0" cellspacing="0" style="background-color: #ffffff; border-radius: 8px; overflow: hidden;">
                    <tr>
                        <td style="background-color: #4F46E5; padding: 30px; text-align: center;">
                            <h1 style="margin: 0; color: #ffffff; font-size: 28px;">{app_name}</h1>
                        </td>
                    </tr>
                    <tr>
                        <td style="padding: 40px 30px;">
                            <h2 style="margin: 0 0 20px 0; color: #333333; font-size: 24px;">{title}</h2>
                            <p style="margin: 0 0 20px 0; color: #666666; font-size: 16px; line-height: 1.5;">
                                Hi <strong>{greeting_name}</strong>,
                            </p>
                            <p style="margin: 0 0 20px 0; color: #666666; font-size: 16px; line-height: 1.5;">
                                {message}
                            </p>
                            <table width="100%" cellpadding="0" cellspacing="0" style="margin: 30px 0;">
                                <tr>
                                    <td align="center">
                                        <a href="{action_link}" style="display: inline-block; padding: 14px 40px; background-color: #4F46E5; color: #ffffff; text-decoration: none; border-radius: 6px; font-size: 16px; font-weight: bold;">{action_text}</a>
                                    </td>
                                </tr>
                            </table>
                        </td>
                    </tr>
                    <tr>
                        <td style="background-color: #f8f9fa; padding: 20px 30px; text-align: center; border-top: 1px solid #e9ecef;">
                            <p style="margin: 0; color: #999999; font-size: 12px;">
                                This is an automated email from {app_name}. Please do not reply.
                            </p>
                        </td>
                    </tr>
                </table>
            </td>
        </tr>
    </table>
</body>
</html>"#,
            title = title,
            app_name = self.config.from_name,
            greeting_name = greeting_name,
            message = message,
            action_link = self.config.frontend_url,
            action_text = action_text,
        )
    }
}

#[async_trait]
impl NotificationGateway for EmailService {
    #[instrument(skip(self))]
    async fn send_lesson_reminder(
        &self,
        to_email: &str,
        first_name: &str,
        lesson_title: &str,
        starts_at: DateTime<Utc>,
        minutes_before: i64,
    ) -> Result<(), AppError> {
        let subject = format!("{} - Lesson Reminder", self.config.from_name);
        let start = starts_at.format("%Y-%m-%d %H:%M UTC");
        let body = format!(
            "Your lesson <strong>{}</strong> starts at <strong>{}</strong>. \
             Only {} minutes left! Get ready to slay that class.",
            lesson_title, start, minutes_before
        );
        let text_body = format!(
            "Hi {},\n\nYour lesson \"{}\" starts at {}. Only {} minutes left!\n",
            first_name, lesson_title, start, minutes_before
        );
        let html_body = self.branded_template(&subject, first_name, &body, "View Timetable");

        self.send_email(to_email, &subject, &text_body, &html_body)
            .await
    }
}
