//! Plain-text message composition.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::Message;

use crate::submission::Submission;

/// Subject line on every relayed submission.
pub const SUBJECT: &str = "New Consultation Request";

/// The plain-text body the business inbox receives.
pub fn plain_body(submission: &Submission) -> String {
    format!(
        "Name: {}\nBusiness Name: {}\nEmail: {}\nContact: {}\n\nThis client requests to contact you.",
        submission.name,
        submission.business_name_or_placeholder(),
        submission.email,
        submission.phone,
    )
}

/// Build the outbound message. Reply-To points at the submitter so the
/// business can answer directly from the inbox.
pub fn build(
    sender: Mailbox,
    recipient: Mailbox,
    submission: &Submission,
) -> Result<Message, lettre::error::Error> {
    let mut builder = Message::builder()
        .from(sender)
        .to(recipient)
        .subject(SUBJECT)
        .header(ContentType::TEXT_PLAIN);

    // Validation already parsed the address; skip Reply-To if it somehow fails
    if let Ok(reply_to) = submission.email.parse::<Mailbox>() {
        builder = builder.reply_to(reply_to);
    }

    builder.body(plain_body(submission))
}
