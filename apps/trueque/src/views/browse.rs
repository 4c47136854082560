use anyhow::Result;
use marketplace::model::{OfferCategory, OfferFilter};
use marketplace::session::{AppContext, Page};

use super::{Console, Flow};

pub async fn show(ctx: &AppContext, term: &mut Console) -> Result<Flow> {
    term.say("\n-- Browse offers --").await?;
    let Some(search) = term.ask("Search (blank for all)").await? else {
        return Ok(Flow::Quit);
    };
    let Some(category) = term
        .ask("Category: producto, servicio or conocimiento (blank for all)")
        .await?
    else {
        return Ok(Flow::Quit);
    };
    let category = if category.is_empty() {
        None
    } else {
        match category.parse::<OfferCategory>() {
            Ok(c) => Some(c),
            Err(e) => {
                term.say(e.to_string()).await?;
                None
            }
        }
    };

    let offers = ctx.browse(&OfferFilter { search, category });
    if offers.is_empty() {
        term.say("No offers match.").await?;
    }
    for (i, offer) in offers.iter().enumerate() {
        term.say(format!(
            "  {}) {} [{}] - {} - by {}",
            i + 1,
            offer.title,
            offer.category,
            offer.location,
            offer.user_name
        ))
        .await?;
    }

    let Some(pick) = term.ask("Open offer number (blank goes back)").await? else {
        return Ok(Flow::Quit);
    };
    if pick.is_empty() {
        ctx.navigate(Page::Dashboard);
        return Ok(Flow::Continue);
    }
    match pick.parse::<usize>().ok().and_then(|n| offers.get(n.wrapping_sub(1))) {
        Some(offer) => ctx.select_offer(offer.clone()),
        None => term.say(format!("No offer number '{pick}'")).await?,
    }
    Ok(Flow::Continue)
}
