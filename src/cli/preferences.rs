use super::ui;
use crate::core::{FetchStatus, Session};
use anyhow::Result;

pub fn toggle_favorite(session: &mut Session, code: &str) -> Result<()> {
    let now_favorite = session.toggle_favorite(code)?;
    if now_favorite {
        println!(
            "{} {code} added to favorites",
            ui::style_text("★", ui::StyleType::Favorite)
        );
    } else {
        println!("{code} removed from favorites");
    }
    Ok(())
}

pub async fn base_currency(session: &mut Session, code: Option<&str>) -> Result<()> {
    let Some(code) = code else {
        println!(
            "{} {}",
            ui::style_text("Base currency:", ui::StyleType::Label),
            ui::style_text(session.preferences().base_currency(), ui::StyleType::Value)
        );
        return Ok(());
    };

    let pb = ui::new_spinner(&format!("Loading exchange rates for {code}"));
    let status = session.set_base_currency(code).await?;
    pb.finish_and_clear();

    println!(
        "{} {}",
        ui::style_text("Base currency set to", ui::StyleType::Label),
        ui::style_text(code, ui::StyleType::Value)
    );
    if status != FetchStatus::Succeeded {
        println!("{}", ui::rates_status_line(session.rates()));
    }
    Ok(())
}
