use anyhow::Result;
use marketplace::model::{Credentials, SignupRequest};
use marketplace::session::{AppContext, Page};

use super::{Console, Flow};

pub async fn login(ctx: &AppContext, term: &mut Console) -> Result<Flow> {
    term.say("\n-- Log in -- (blank email goes back)").await?;
    let Some(email) = term.ask("Email").await? else {
        return Ok(Flow::Quit);
    };
    if email.is_empty() {
        ctx.navigate(Page::Landing);
        return Ok(Flow::Continue);
    }
    let Some(password) = term.ask("Password").await? else {
        return Ok(Flow::Quit);
    };

    // Failures surface as the session notice.
    let _ = ctx.login(Credentials { email, password }).await;
    Ok(Flow::Continue)
}

pub async fn signup(ctx: &AppContext, term: &mut Console) -> Result<Flow> {
    term.say("\n-- Sign up -- (blank name goes back)").await?;
    let Some(name) = term.ask("Name").await? else {
        return Ok(Flow::Quit);
    };
    if name.is_empty() {
        ctx.navigate(Page::Landing);
        return Ok(Flow::Continue);
    }
    let Some(email) = term.ask("Email").await? else {
        return Ok(Flow::Quit);
    };
    let Some(password) = term.ask("Password (6+ characters)").await? else {
        return Ok(Flow::Quit);
    };

    let _ = ctx
        .signup(SignupRequest {
            name,
            email,
            password,
        })
        .await;
    Ok(Flow::Continue)
}
