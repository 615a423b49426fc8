use handlebars::{Handlebars, RenderError};
use serde::Serialize;

use crate::domain::expiring_member::ExpiringMember;

pub const REMINDER_SUBJECT: &str = "Your Subscription is Expiring Tomorrow";
pub const REMINDER_HEADING: &str = "Subscription Expiring Tomorrow";

/// Plain text reminder for a member whose subscription ends tomorrow.
pub fn reminder_message(member: &ExpiringMember) -> String {
    format!(
        "Dear {name},

This is a friendly reminder that your subscription at {business} will expire tomorrow ({end_date}).

Your current plan: {plan}
Price: ${price}

To ensure uninterrupted service, please renew your subscription before it expires.

If you have any questions or need assistance, please don't hesitate to contact us.

Best regards,
{business} Team",
        name = member.full_name,
        business = member.business_name,
        end_date = member.end_date.format("%B %d, %Y"),
        plan = member.plan_name,
        price = member.plan_price,
    )
}

// Layout shared by every outgoing email. Handlebars escapes `{{ }}` expressions.
const EMAIL_LAYOUT: &str = include_str!("../templates/email_layout.hbs");

#[derive(Serialize)]
struct LayoutContext<'a> {
    heading: &'a str,
    paragraphs: Vec<Vec<&'a str>>,
}

/// Wraps a plain text message into the HTML layout. Blank lines separate paragraphs and
/// single line breaks become `<br>`.
pub fn html_email(heading: &str, message: &str) -> Result<String, RenderError> {
    let context = LayoutContext {
        heading,
        paragraphs: message
            .split("\n\n")
            .map(|paragraph| paragraph.split('\n').collect())
            .collect(),
    };

    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(true);

    handlebars.render_template(EMAIL_LAYOUT, &context)
}

pub fn reminder_email(member: &ExpiringMember) -> Result<String, RenderError> {
    html_email(REMINDER_HEADING, &reminder_message(member))
}
