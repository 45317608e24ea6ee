use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{info, instrument};

use scholaris_config::EmailConfig;
use scholaris_core::AppError;
use scholaris_models::admissions::Admission;
use scholaris_models::students::Student;

/// A fully rendered email waiting to be delivered.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

impl OutboundEmail {
    /// Acknowledges a freshly submitted admission application.
    pub fn admission_received(config: &EmailConfig, to: &str, admission: &Admission) -> Self {
        let school = &config.school_name;
        let text_body = format!(
            "Dear Parent/Guardian,\n\n\
             Thank you for applying to {school}.\n\n\
             Application number: {number}\n\
             Student name: {name}\n\
             Class applied: {class}\n\n\
             We will review the application and contact you soon.\n\n\
             Regards,\n\
             Admissions Office, {school}",
            school = school,
            number = admission.application_number,
            name = admission.student_name,
            class = admission.class_applied,
        );

        let body = format!(
            r#"<p style="margin: 0 0 20px 0; color: #666666; font-size: 16px; line-height: 1.5;">
                                Dear Parent/Guardian,
                            </p>
                            <p style="margin: 0 0 20px 0; color: #666666; font-size: 16px; line-height: 1.5;">
                                Thank you for applying to <strong>{}</strong>. Your application has been received.
                            </p>
                            {}
                            <p style="margin: 0; color: #666666; font-size: 14px; line-height: 1.5;">
                                We will review the application and contact you soon.
                            </p>"#,
            school,
            details_table(&[
                ("Application Number", admission.application_number.as_str()),
                ("Student Name", admission.student_name.as_str()),
                ("Class Applied", admission.class_applied.as_str()),
            ]),
        );

        Self {
            to: to.to_string(),
            subject: format!("Admission Application Received - {}", admission.application_number),
            text_body,
            html_body: layout(school, "#4F46E5", "Application Received", &body),
        }
    }

    /// Tells the family the admission was approved and the student enrolled.
    pub fn admission_approved(config: &EmailConfig, to: &str, student: &Student) -> Self {
        let school = &config.school_name;
        let section = student.section.as_deref().unwrap_or("-");
        let text_body = format!(
            "Dear Parent/Guardian,\n\n\
             We are pleased to inform you that the admission of {name} to {school} has been approved.\n\n\
             Admission number: {number}\n\
             Class: {class}\n\
             Section: {section}\n\n\
             Welcome to the {school} family.\n\n\
             Regards,\n\
             Admissions Office, {school}",
            name = student.name,
            school = school,
            number = student.admission_number,
            class = student.class_name,
            section = section,
        );

        let body = format!(
            r#"<p style="margin: 0 0 20px 0; color: #666666; font-size: 16px; line-height: 1.5;">
                                We are pleased to inform you that the admission of <strong>{}</strong> has been approved.
                            </p>
                            {}
                            <p style="margin: 0; color: #666666; font-size: 14px; line-height: 1.5;">
                                Welcome to the {} family.
                            </p>"#,
            student.name,
            details_table(&[
                ("Admission Number", student.admission_number.as_str()),
                ("Class", student.class_name.as_str()),
                ("Section", section),
            ]),
            school,
        );

        Self {
            to: to.to_string(),
            subject: format!("Admission Approved - {}", student.admission_number),
            text_body,
            html_body: layout(school, "#10B981", "Admission Approved", &body),
        }
    }

    pub fn payment_receipt(
        config: &EmailConfig,
        to: &str,
        student_name: &str,
        amount: f64,
        receipt_number: &str,
        pending_amount: f64,
    ) -> Self {
        let school = &config.school_name;
        let paid = format!("₹{:.2}", amount);
        let pending = format!("₹{:.2}", pending_amount.max(0.0));
        let text_body = format!(
            "Dear Parent/Guardian,\n\n\
             We have received a fee payment for {name}.\n\n\
             Receipt number: {receipt}\n\
             Amount paid: {paid}\n\
             Balance due: {pending}\n\n\
             Regards,\n\
             Accounts Office, {school}",
            name = student_name,
            receipt = receipt_number,
            paid = paid,
            pending = pending,
            school = school,
        );

        let body = format!(
            r#"<p style="margin: 0 0 20px 0; color: #666666; font-size: 16px; line-height: 1.5;">
                                We have received a fee payment for <strong>{}</strong>.
                            </p>
                            {}"#,
            student_name,
            details_table(&[
                ("Receipt Number", receipt_number),
                ("Amount Paid", paid.as_str()),
                ("Balance Due", pending.as_str()),
            ]),
        );

        Self {
            to: to.to_string(),
            subject: format!("Fee Payment Receipt - {}", receipt_number),
            text_body,
            html_body: layout(school, "#0EA5E9", "Payment Received", &body),
        }
    }
}

pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Delivers `email` over SMTP. With SMTP disabled the message is only logged.
    #[instrument(skip(self, email), fields(to = %email.to, subject = %email.subject))]
    pub async fn send(&self, email: &OutboundEmail) -> Result<(), AppError> {
        if !self.config.enabled {
            info!("SMTP disabled, email not sent");
            return Ok(());
        }

        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let message = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| AppError::internal_error(format!("Invalid from email: {}", e)))?,
            )
            .to(email
                .to
                .parse()
                .map_err(|e| AppError::internal_error(format!("Invalid to email: {}", e)))?)
            .subject(email.subject.as_str())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(email.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(email.html_body.clone()),
                    ),
            )
            .map_err(|e| AppError::internal_error(format!("Failed to build email: {}", e)))?;

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
                    AppError::internal_error(format!("Failed to create SMTP relay: {}", e))
                })?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build()
        };

        tokio::task::spawn_blocking(move || mailer.send(&message))
            .await
            .map_err(|e| AppError::internal_error(format!("Task join error: {}", e)))?
            .map_err(|e| AppError::internal_error(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}

fn details_table(rows: &[(&str, &str)]) -> String {
    let rows: String = rows
        .iter()
        .map(|(label, value)| {
            format!(
                r#"<tr>
                                    <td style="padding: 8px 0; color: #999999; font-size: 14px;">{}</td>
                                    <td style="padding: 8px 0; color: #333333; font-size: 14px; font-weight: bold;">{}</td>
                                </tr>"#,
                label, value
            )
        })
        .collect();

    format!(
        r#"<table width="100%" cellpadding="0" cellspacing="0" style="margin: 0 0 20px 0; border-top: 1px solid #e9ecef; border-bottom: 1px solid #e9ecef;">
                                {}
                            </table>"#,
        rows
    )
}

fn layout(school: &str, accent: &str, heading: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{heading}</title>
</head>
<body style="margin: 0; padding: 0; font-family: Arial, sans-serif; background-color: #f4f4f4;">
    <table width="100%" cellpadding="0" cellspacing="0" style="background-color: #f4f4f4; padding: 20px;">
        <tr>
            <td align="center">
                <table width="600" cellpadding="0" cellspacing="0" style="background-color: #ffffff; border-radius: 8px; overflow: hidden; box-shadow: 0 2px 4px rgba(0,0,0,0.1);">
                    <tr>
                        <td style="background-color: {accent}; padding: 30px; text-align: center;">
                            <h1 style="margin: 0; color: #ffffff; font-size: 28px;">{school}</h1>
                        </td>
                    </tr>
                    <tr>
                        <td style="padding: 40px 30px;">
                            <h2 style="margin: 0 0 20px 0; color: #333333; font-size: 24px;">{heading}</h2>
                            {body}
                        </td>
                    </tr>
                    <tr>
                        <td style="background-color: #f8f9fa; padding: 20px 30px; text-align: center; border-top: 1px solid #e9ecef;">
                            <p style="margin: 0; color: #999999; font-size: 12px;">
                                This is an automated email from {school}. Please do not reply.
                            </p>
                        </td>
                    </tr>
                </table>
            </td>
        </tr>
    </table>
</body>
</html>"#,
        heading = heading,
        accent = accent,
        school = school,
        body = body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EmailConfig {
        EmailConfig {
            enabled: false,
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@school.test".to_string(),
            from_name: "Test School".to_string(),
            school_name: "Test School".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
        }
    }

    #[test]
    fn test_payment_receipt_rendering() {
        let email =
            OutboundEmail::payment_receipt(&config(), "parent@example.com", "Asha", 1200.0, "REC2025123456", 0.0);
        assert_eq!(email.subject, "Fee Payment Receipt - REC2025123456");
        assert!(email.text_body.contains("₹1200.00"));
        assert!(email.html_body.contains("REC2025123456"));
        assert!(email.html_body.contains("Test School"));
    }

    #[test]
    fn test_negative_balance_renders_as_zero() {
        let email =
            OutboundEmail::payment_receipt(&config(), "parent@example.com", "Asha", 1500.0, "REC2025123456", -300.0);
        assert!(email.text_body.contains("Balance due: ₹0.00"));
    }

    #[tokio::test]
    async fn test_disabled_smtp_is_a_successful_noop() {
        let service = EmailService::new(config());
        let email =
            OutboundEmail::payment_receipt(&config(), "parent@example.com", "Asha", 10.0, "REC2025123456", 0.0);
        assert!(service.send(&email).await.is_ok());
    }
}
