//! Outbound mail reporting.
//!
//! # Responsibility
//! - Render a row set as an HTML table plus a CSV attachment.
//! - Deliver the report over an authenticated SMTP submission channel.
//!
//! # Invariants
//! - Delivery failures collapse to one generic user-facing message; the
//!   concrete cause stays available through `Error::source`.
//! - No retry and no queuing: one interaction, one delivery attempt.

use crate::model::article::{column_names, Article};
use chrono::NaiveDate;
use csv::WriterBuilder;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type for the notifier APIs.
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Mail delivery failure.
#[derive(Debug)]
pub enum NotifyError {
    /// Sender or receiver mailbox could not be parsed.
    Address(lettre::address::AddressError),
    /// Message assembly failed.
    Message(lettre::error::Error),
    /// Attachment content type was rejected.
    ContentType(lettre::message::header::ContentTypeErr),
    /// CSV attachment rendering failed.
    Csv(csv::Error),
    /// SMTP-level failure (connect, auth, send).
    Transport(lettre::transport::smtp::Error),
}

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // one generic message for every cause, per the error taxonomy
        write!(f, "cannot send the report email")
    }
}

impl Error for NotifyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Address(err) => Some(err),
            Self::Message(err) => Some(err),
            Self::ContentType(err) => Some(err),
            Self::Csv(err) => Some(err),
            Self::Transport(err) => Some(err),
        }
    }
}

impl From<lettre::address::AddressError> for NotifyError {
    fn from(value: lettre::address::AddressError) -> Self {
        Self::Address(value)
    }
}

impl From<lettre::error::Error> for NotifyError {
    fn from(value: lettre::error::Error) -> Self {
        Self::Message(value)
    }
}

impl From<csv::Error> for NotifyError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<lettre::transport::smtp::Error> for NotifyError {
    fn from(value: lettre::transport::smtp::Error) -> Self {
        Self::Transport(value)
    }
}

/// Outbound mail configuration, consumed once at startup.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// SMTP relay hostname; delivery uses the submission port with
    /// opportunistic encryption.
    pub smtp_host: String,
    /// Relay account name.
    pub username: String,
    /// Relay account secret.
    pub password: String,
    /// Sender mailbox, e.g. `Stock <stock@example.com>`.
    pub sender: String,
    /// Receiver mailbox.
    pub receiver: String,
}

/// Authenticated SMTP notifier.
pub struct SmtpNotifier {
    smtp: SmtpTransport,
    sender: String,
    receiver: String,
}

impl SmtpNotifier {
    /// Builds a notifier from configuration.
    ///
    /// The transport targets the standard submission port with STARTTLS.
    pub fn new(config: &MailerConfig) -> NotifyResult<Self> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());
        let smtp = SmtpTransport::starttls_relay(&config.smtp_host)?
            .credentials(credentials)
            .build();
        Ok(Self {
            smtp,
            sender: config.sender.clone(),
            receiver: config.receiver.clone(),
        })
    }

    /// Sends the row set as an HTML table with a CSV attachment named
    /// `products_<DD/MM/YYYY>.csv`.
    pub fn send_stock_report(
        &self,
        articles: &[Article],
        report_date: NaiveDate,
    ) -> NotifyResult<()> {
        let html = render_html_table(articles);
        let csv_body = render_csv(articles)?;
        let attachment = Attachment::new(attachment_filename(report_date)).body(
            csv_body,
            "text/csv; charset=utf-8"
                .parse::<ContentType>()
                .map_err(NotifyError::ContentType)?,
        );

        let message = Message::builder()
            .from(self.sender.parse()?)
            .to(self.receiver.parse()?)
            .subject(format!(
                "Stock report {}",
                report_date.format("%d/%m/%Y")
            ))
            .multipart(
                MultiPart::mixed()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html),
                    )
                    .singlepart(attachment),
            )?;

        self.smtp.send(&message)?;
        info!(
            "event=mail_sent module=notify status=ok rows={} receiver={}",
            articles.len(),
            self.receiver
        );
        Ok(())
    }
}

/// Attachment name carrying the localized report date.
pub fn attachment_filename(report_date: NaiveDate) -> String {
    format!("products_{}.csv", report_date.format("%d/%m/%Y"))
}

/// Renders the row set as an HTML table with escaped cells.
///
/// Dates are shown in the localized `DD/MM/YYYY` form used by the report
/// readers; the machine-readable attachment keeps ISO dates.
pub fn render_html_table(articles: &[Article]) -> String {
    let mut html = String::from("<table border=\"1\">\n<tr>");
    for column in column_names() {
        html.push_str("<th>");
        html.push_str(column);
        html.push_str("</th>");
    }
    html.push_str("</tr>\n");
    for article in articles {
        html.push_str("<tr>");
        for cell in [
            article.code.as_str(),
            article.designation.as_str(),
            &article.dlc.format("%d/%m/%Y").to_string(),
            &article.quantite.to_string(),
        ] {
            html.push_str("<td>");
            html.push_str(&escape_html(cell));
            html.push_str("</td>");
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>");
    html
}

/// Renders the row set as canonical-header CSV with ISO dates.
pub fn render_csv(articles: &[Article]) -> NotifyResult<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut writer = WriterBuilder::new().from_writer(&mut buffer);
        writer.write_record(column_names())?;
        for article in articles {
            writer.write_record(article.to_cells())?;
        }
        writer
            .flush()
            .map_err(|err| NotifyError::Csv(err.into()))?;
    }
    Ok(buffer)
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::{attachment_filename, render_csv, render_html_table};
    use crate::model::article::Article;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn attachment_name_uses_localized_date() {
        assert_eq!(attachment_filename(date(2025, 3, 1)), "products_01/03/2025.csv");
    }

    #[test]
    fn html_table_escapes_markup_in_cells() {
        let rows = vec![Article::new("001", "Widget <b>&co</b>", date(2025, 3, 15), 10)];
        let html = render_html_table(&rows);
        assert!(html.contains("<th>designation</th>"));
        assert!(html.contains("Widget &lt;b&gt;&amp;co&lt;/b&gt;"));
        assert!(html.contains("<td>15/03/2025</td>"));
    }

    #[test]
    fn csv_attachment_keeps_iso_dates_and_canonical_header() {
        let rows = vec![Article::new("001", "Widget", date(2025, 3, 15), 10)];
        let body = render_csv(&rows).expect("csv renders");
        let text = String::from_utf8(body).expect("csv is utf-8");
        assert!(text.starts_with("code,designation,dlc,quantite\n"));
        assert!(text.contains("001,Widget,2025-03-15,10"));
    }
}
