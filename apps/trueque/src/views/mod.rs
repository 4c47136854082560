//! One view per page. A view renders the snapshot, reads one intent and
//! hands it to the [`AppContext`]; the loop re-routes after every step.

mod auth;
mod browse;
mod dashboard;
mod detail;
mod editor;
mod landing;

use anyhow::Result;
use marketplace::session::{AppContext, NoticeKind, Page};
use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::terminal::Terminal;

pub type Console =
    Terminal<Box<dyn AsyncBufRead + Unpin + Send>, Box<dyn AsyncWrite + Unpin + Send>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub async fn run(ctx: &AppContext, term: &mut Console, title: &str) -> Result<()> {
    loop {
        if let Some(notice) = ctx.take_notice() {
            let marker = match notice.kind {
                NoticeKind::Info => "*",
                NoticeKind::Error => "!",
            };
            term.say(format!("{marker} {}", notice.message)).await?;
        }

        let page = ctx.current_page();
        tracing::debug!(%page, "Rendering page");
        let flow = match page {
            Page::Landing => landing::show(ctx, term, title).await?,
            Page::Login => auth::login(ctx, term).await?,
            Page::Signup => auth::signup(ctx, term).await?,
            Page::Dashboard => dashboard::show(ctx, term).await?,
            Page::BrowseOffers => browse::show(ctx, term).await?,
            Page::OfferDetail => detail::show(ctx, term).await?,
            Page::CreateOffer => editor::show(ctx, term).await?,
        };
        if flow == Flow::Quit {
            term.say("Bye!").await?;
            return Ok(());
        }
    }
}
