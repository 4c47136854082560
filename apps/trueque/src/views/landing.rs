use anyhow::Result;
use marketplace::session::{AppContext, Page};

use super::{Console, Flow};

pub async fn show(ctx: &AppContext, term: &mut Console, title: &str) -> Result<Flow> {
    term.say(format!("\n== {title} ==")).await?;
    term.say("Barter products, services and knowledge with your community.")
        .await?;
    term.say("1) Log in   2) Sign up   0) Quit").await?;

    let Some(choice) = term.ask("Choose").await? else {
        return Ok(Flow::Quit);
    };
    match choice.as_str() {
        "1" => {
            ctx.navigate(Page::Login);
        }
        "2" => {
            ctx.navigate(Page::Signup);
        }
        "0" => return Ok(Flow::Quit),
        other => term.say(format!("Unknown option '{other}'")).await?,
    }
    Ok(Flow::Continue)
}
