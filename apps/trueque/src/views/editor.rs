use anyhow::Result;
use std::path::Path;

use marketplace::model::{ImageUpload, NewOffer, OfferCategory};
use marketplace::session::{AppContext, Page};

use super::{Console, Flow};

fn blank_form() -> NewOffer {
    NewOffer {
        category: OfferCategory::Producto,
        title: String::new(),
        description: String::new(),
        location: String::new(),
        image_url: None,
        exchange_value: String::new(),
        whatsapp_number: String::new(),
    }
}

/// MIME type from the file extension; non-images are refused downstream.
fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

macro_rules! answer {
    ($e:expr) => {
        match $e.await? {
            Some(value) => value,
            None => return Ok(Flow::Quit),
        }
    };
}

pub async fn show(ctx: &AppContext, term: &mut Console) -> Result<Flow> {
    let editing = if ctx.is_editing() {
        ctx.selected_offer()
    } else {
        None
    };
    let base = editing.as_ref().map(NewOffer::from).unwrap_or_else(blank_form);

    term.say(if editing.is_some() {
        "\n-- Edit offer -- (blank keeps the current value, '-' as title cancels)"
    } else {
        "\n-- New offer -- ('-' as title cancels)"
    })
    .await?;

    let title = answer!(term.ask_or("Title", &base.title));
    if title == "-" {
        match editing {
            Some(offer) => ctx.select_offer(offer),
            None => {
                ctx.navigate(Page::Dashboard);
            }
        }
        return Ok(Flow::Continue);
    }
    let category = answer!(term.ask_or(
        "Category (producto, servicio, conocimiento)",
        base.category.as_str()
    ));
    let category = match category.parse::<OfferCategory>() {
        Ok(c) => c,
        Err(e) => {
            term.say(e.to_string()).await?;
            return Ok(Flow::Continue);
        }
    };
    let description = answer!(term.ask_or("Description", &base.description));
    let location = answer!(term.ask_or("Location", &base.location));
    let exchange_value = answer!(term.ask_or("What do you want in exchange", &base.exchange_value));
    let whatsapp_number = answer!(term.ask_or("WhatsApp number", &base.whatsapp_number));

    let mut image_url = base.image_url.clone();
    let image_path = answer!(term.ask("Image file (blank to skip)"));
    if !image_path.is_empty() {
        let path = Path::new(&image_path);
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                let upload = ImageUpload {
                    file_name: path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    content_type: content_type_for(path).to_string(),
                    bytes,
                };
                match ctx.upload_image(upload).await {
                    Ok(url) => image_url = Some(url),
                    Err(_) => return Ok(Flow::Continue),
                }
            }
            Err(e) => {
                term.say(format!("Cannot read '{image_path}': {e}")).await?;
                return Ok(Flow::Continue);
            }
        }
    }

    let form = NewOffer {
        category,
        title,
        description,
        location,
        image_url,
        exchange_value,
        whatsapp_number,
    };
    // Failures keep the editor open with the notice shown.
    let _ = match editing {
        Some(mut offer) => {
            form.apply_to(&mut offer);
            ctx.update_offer(offer).await
        }
        None => ctx.add_offer(form).await,
    };
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_image_types() {
        assert_eq!(content_type_for(Path::new("a/b.JPG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("x.webp")), "image/webp");
        assert_eq!(content_type_for(Path::new("notes.txt")), "application/octet-stream");
        assert_eq!(content_type_for(Path::new("noext")), "application/octet-stream");
    }
}
