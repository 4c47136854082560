use anyhow::Result;
use marketplace::session::{AppContext, Page};

use super::{Console, Flow};

pub async fn show(ctx: &AppContext, term: &mut Console) -> Result<Flow> {
    let Some(user) = ctx.current_user() else {
        return Ok(Flow::Continue);
    };
    let reputation = ctx.average_rating_by_user_id(user.id).await;

    term.say(format!("\n== Welcome, {} ==", user.name)).await?;
    term.say(format!(
        "Points: {} | Reputation: {:.1} ({} votes)",
        user.points, reputation.average, reputation.count
    ))
    .await?;

    let mine = ctx.my_offers();
    if mine.is_empty() {
        term.say("You have no offers yet.").await?;
    } else {
        term.say("Your offers:").await?;
        for (i, offer) in mine.iter().enumerate() {
            term.say(format!("  {}) {} [{}]", i + 1, offer.title, offer.category))
                .await?;
        }
    }
    term.say("b) Browse   n) New offer   <n>) Open your offer   r) Refresh   l) Log out   0) Quit")
        .await?;

    let Some(choice) = term.ask("Choose").await? else {
        return Ok(Flow::Quit);
    };
    match choice.as_str() {
        "b" => {
            ctx.navigate(Page::BrowseOffers);
        }
        "n" => ctx.start_new_offer(),
        "r" => {
            ctx.fetch_offers().await;
        }
        "l" => ctx.logout().await,
        "0" => return Ok(Flow::Quit),
        other => match other.parse::<usize>().ok().and_then(|n| mine.get(n.wrapping_sub(1))) {
            Some(offer) => ctx.select_offer(offer.clone()),
            None => term.say(format!("Unknown option '{other}'")).await?,
        },
    }
    Ok(Flow::Continue)
}
