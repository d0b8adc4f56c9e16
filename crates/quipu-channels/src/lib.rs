//! # quipu-channels
//!
//! Twilio WhatsApp integration: outbound message delivery and the TwiML
//! webhook reply format.
//! Docs: <https://www.twilio.com/docs/whatsapp/api>

pub mod twilio;

pub use twilio::{DisabledDelivery, TwilioSender};

/// Extract the bare phone number from a Twilio `From` field.
///
/// Twilio sends `whatsapp:+573001112233`; form decoding can turn the `+`
/// into a space, so it is restored before splitting off the channel prefix.
pub fn strip_channel_prefix(from: &str) -> String {
    let restored = from.replace(' ', "+");
    match restored.split_once(':') {
        Some((_, phone)) => phone.to_string(),
        None => restored,
    }
}

/// Wrap a reply body in the TwiML envelope Twilio expects from a webhook.
pub fn twiml_reply(body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response><Message>{}</Message></Response>",
        xml_escape(body)
    )
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
