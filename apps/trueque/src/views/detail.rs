use anyhow::Result;
use marketplace::session::{AppContext, Page};

use super::{Console, Flow};

pub async fn show(ctx: &AppContext, term: &mut Console) -> Result<Flow> {
    let (Some(user), Some(offer)) = (ctx.current_user(), ctx.selected_offer()) else {
        ctx.navigate(Page::BrowseOffers);
        return Ok(Flow::Continue);
    };
    let own = offer.user_id == user.id;
    let summary = ctx.average_rating(offer.id).await;

    term.say(format!("\n== {} ==", offer.title)).await?;
    term.say(format!("Category: {}", offer.category)).await?;
    term.say(format!("Offered by: {}", offer.user_name)).await?;
    term.say(format!("Location: {}", offer.location)).await?;
    term.say(format!("Wants in exchange: {}", offer.exchange_value))
        .await?;
    term.say(offer.description.as_str()).await?;
    if let Some(url) = &offer.image_url {
        term.say(format!("Image: {url}")).await?;
    }
    term.say(format!(
        "Rating: {:.1} ({} votes)",
        summary.average, summary.count
    ))
    .await?;

    if own {
        term.say("e) Edit   b) Back   0) Quit").await?;
    } else {
        if let Some(mine) = ctx.my_rating(offer.id).await {
            term.say(format!("Your rating: {}", mine.get())).await?;
        }
        term.say("r) Rate   c) Contact owner   b) Back   0) Quit")
            .await?;
    }

    let Some(choice) = term.ask("Choose").await? else {
        return Ok(Flow::Quit);
    };
    match (choice.as_str(), own) {
        ("e", true) => {
            let _ = ctx.edit_offer(offer);
        }
        ("r", false) => {
            let Some(stars) = term.ask("Stars (1-5)").await? else {
                return Ok(Flow::Quit);
            };
            match stars.parse::<u8>() {
                Ok(value) => {
                    let _ = ctx.submit_rating(offer.id, value).await;
                }
                Err(_) => term.say(format!("'{stars}' is not a number")).await?,
            }
        }
        ("c", false) => {
            if let Ok(link) = ctx.contact_link(&offer) {
                term.say(format!("Open this link to chat with the owner:\n{link}"))
                    .await?;
            }
        }
        ("b", _) => {
            ctx.navigate(Page::BrowseOffers);
        }
        ("0", _) => return Ok(Flow::Quit),
        (other, _) => term.say(format!("Unknown option '{other}'")).await?,
    }
    Ok(Flow::Continue)
}
