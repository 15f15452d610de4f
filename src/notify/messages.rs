//! Giver notification templates
//!
//! Two wordings: one for pairs formed within a region, one for global
//! cross-region pairs (which additionally promises covered shipping).
//! Both carry the receiver's name, mailing address, likes and dislikes in
//! Slack mrkdwn.

use crate::types::{Assignment, Participant};

/// Render the message sent to the giver of an assignment
pub fn render_giver_notification(assignment: &Assignment) -> String {
    if assignment.same_region {
        same_region_message(assignment)
    } else {
        cross_region_message(assignment)
    }
}

fn same_region_message(assignment: &Assignment) -> String {
    let giver = &assignment.giver;
    let receiver = &assignment.receiver;
    format!(
        "*Hey {giver_name}*, you've been matched with somebody for *Secret Santa*! \
Be sure to send a gift as soon as possible! 🎁\n\n\
*Here is who they are!* :santa:\n\
> *{receiver_name}*\n\n\
*Here is where they live*\n\
{address}\n\
*Looks like they like the following:* 💖\n\
> {likes}\n\n\
*Here's what they don't like!*\n\
> {dislikes}\n\n\
Try to get this shipped out soon, and get ready to receive your own cool gift! \
Reach out to the organizers with any questions.",
        giver_name = giver.name,
        receiver_name = receiver.name,
        address = address_block(receiver),
        likes = receiver.likes.as_deref().unwrap_or(""),
        dislikes = receiver.dislikes.as_deref().unwrap_or(""),
    )
}

fn cross_region_message(assignment: &Assignment) -> String {
    let giver = &assignment.giver;
    let receiver = &assignment.receiver;
    format!(
        "*Hello {giver_name}*, we couldn't find a match in your region, but we've \
paired you with someone outside your region for *Secret Santa*!\n\
*Your shipping costs will be covered for this international match*! Please contact \
the organizers to arrange the details.\n\
Be sure to send your gift as soon as possible! 🎁\n\n\
*Here is your match!* :santa:\n\
> *{receiver_name}*\n\n\
*Their address:*\n\
{address}\n\
*They like:* 💖\n\
> {likes}\n\n\
*They don't like:*\n\
> {dislikes}\n\n\
Remember, this is an international match, so plan accordingly and ship early.",
        giver_name = giver.name,
        receiver_name = receiver.name,
        address = address_block(receiver),
        likes = receiver.likes.as_deref().unwrap_or(""),
        dislikes = receiver.dislikes.as_deref().unwrap_or(""),
    )
}

// The second address line is only rendered when present.
fn address_block(receiver: &Participant) -> String {
    let address = &receiver.address;
    let mut block = format!("> {}\n", address.line1.as_deref().unwrap_or(""));
    if let Some(line2) = address.line2.as_deref() {
        block.push_str(&format!("> {line2}\n"));
    }
    block.push_str(&format!(
        "> {}, {} {}\n> {}\n",
        address.city.as_deref().unwrap_or(""),
        address.state.as_deref().unwrap_or(""),
        address.postal.as_deref().unwrap_or(""),
        address.country.as_deref().unwrap_or(""),
    ));
    block
}
