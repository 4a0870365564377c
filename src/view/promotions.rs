//! Promotion rendering: the worker's rotation pool and the customer's banner
//! and spin-wheel modals.

use askama::Template;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    models::{NewPromotion, Promotion, PromotionContent, PromotionKind},
    spin::{PrizeListError, SpinOutcome, SpinWheel, parse_prize_list},
    ui::i18n::{self, Language, Msg},
    view::html::{HeadingPart, heading_parts},
};

/// Server-side rotation period.
pub const ROTATION_PERIOD_SECS: i64 = 1800;
const LIST_PRIZE_PREVIEW: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PromotionEntry {
    pub id: i64,
    pub title: String,
    pub kind: PromotionKind,
    pub kind_label: String,
    pub summary: String,
    pub active: bool,
}

/// `Prizes: a, b, c...` for wheels, a fixed caption for banners.
pub fn prize_summary(promotion: &Promotion) -> String {
    if promotion.kind != PromotionKind::SpinWheel {
        return "Banner Ad Campaign".to_string();
    }
    let prizes = &promotion.content.prizes;
    if prizes.is_empty() {
        return "Prizes: Default prizes".to_string();
    }
    let mut text = prizes
        .iter()
        .take(LIST_PRIZE_PREVIEW)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if prizes.len() > LIST_PRIZE_PREVIEW {
        text.push_str("...");
    }
    format!("Prizes: {text}")
}

pub fn promotion_entries(promotions: &[Promotion]) -> Vec<PromotionEntry> {
    promotions
        .iter()
        .map(|p| PromotionEntry {
            id: p.id,
            title: p
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Untitled".to_string()),
            kind: p.kind,
            kind_label: p.kind.label().to_string(),
            summary: prize_summary(p),
            active: p.active,
        })
        .collect()
}

/// `MM:SS` until the next 30-minute wall-clock boundary.
pub fn rotation_countdown(now: DateTime<Utc>) -> String {
    let remaining = ROTATION_PERIOD_SECS - now.timestamp().rem_euclid(ROTATION_PERIOD_SECS);
    format!("{:02}:{:02}", remaining / 60, remaining % 60)
}

/// Validated spin-wheel creator input.
pub fn spin_wheel_promotion(title: &str, prizes_csv: &str) -> Result<NewPromotion, PrizeListError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(PrizeListError::MissingTitle);
    }
    Ok(NewPromotion {
        kind: PromotionKind::SpinWheel,
        title: title.to_string(),
        content: PromotionContent {
            prizes: parse_prize_list(prizes_csv)?,
            ..Default::default()
        },
    })
}

struct EntryRow<'a> {
    id: i64,
    tone: &'static str,
    icon: &'static str,
    title: &'a str,
    kind_label: &'a str,
    summary: &'a str,
    status_class: &'static str,
    status: &'static str,
}

#[derive(Template)]
#[template(path = "promotion_list.html")]
struct PromotionListTemplate<'a> {
    entries: Vec<EntryRow<'a>>,
}

pub fn render_promotion_list(entries: &[PromotionEntry]) -> askama::Result<String> {
    let entries = entries
        .iter()
        .map(|entry| {
            let (icon, tone) = if entry.kind == PromotionKind::SpinWheel {
                ("toys", "promo-entry wheel")
            } else {
                ("image", "promo-entry banner")
            };
            let (status_class, status) = if entry.active {
                ("active", "● Active")
            } else {
                ("inactive", "● Inactive")
            };
            EntryRow {
                id: entry.id,
                tone,
                icon,
                title: &entry.title,
                kind_label: &entry.kind_label,
                summary: &entry.summary,
                status_class,
                status,
            }
        })
        .collect();
    PromotionListTemplate { entries }.render()
}

#[derive(Template)]
#[template(path = "banner_modal.html")]
struct BannerModalTemplate<'a> {
    announcement: &'a str,
    image: &'a str,
    heading: Vec<HeadingPart>,
    subtext: &'a str,
    got_it: &'a str,
}

pub fn render_banner_modal(banner: &Promotion, lang: Language) -> askama::Result<String> {
    let content = &banner.content;
    let heading = content
        .text
        .as_deref()
        .or(banner.title.as_deref())
        .unwrap_or_default();
    BannerModalTemplate {
        announcement: i18n::text(lang, Msg::Announcement),
        image: content.image.as_deref().unwrap_or_default(),
        heading: heading_parts(heading),
        subtext: content.subtext.as_deref().unwrap_or_default(),
        got_it: i18n::text(lang, Msg::GotIt),
    }
    .render()
}

struct WheelSegment<'a> {
    style: String,
    prize: &'a str,
}

#[derive(Template)]
#[template(path = "spin_modal.html")]
struct SpinModalTemplate<'a> {
    title: &'a str,
    spin_win: &'a str,
    segments: Vec<WheelSegment<'a>>,
}

pub fn render_spin_modal(wheel: &SpinWheel, lang: Language) -> askama::Result<String> {
    let segment = 360.0 / wheel.prizes.len().max(1) as f64;
    let segments = wheel
        .prizes
        .iter()
        .enumerate()
        .map(|(i, prize)| WheelSegment {
            style: format!("transform: rotate({}deg)", i as f64 * segment),
            prize: prize.as_str(),
        })
        .collect();
    SpinModalTemplate {
        title: &wheel.title,
        spin_win: i18n::text(lang, Msg::SpinWin),
        segments,
    }
    .render()
}

#[derive(Template)]
#[template(path = "spin_result.html")]
struct SpinResultTemplate<'a> {
    style: String,
    you_won: &'a str,
    prize: &'a str,
    /// Empty when the prize carries no discount.
    applied: &'a str,
}

pub fn render_spin_result(outcome: &SpinOutcome, lang: Language) -> askama::Result<String> {
    SpinResultTemplate {
        style: format!("transform: rotate({}deg)", outcome.landing_angle),
        you_won: i18n::text(lang, Msg::YouWon),
        prize: &outcome.prize,
        applied: if outcome.wins_discount {
            i18n::text(lang, Msg::DiscountApplied)
        } else {
            ""
        },
    }
    .render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn promo(kind: PromotionKind, prizes: &[&str]) -> Promotion {
        Promotion {
            id: 3,
            kind,
            title: None,
            content: PromotionContent {
                prizes: prizes.iter().map(|p| p.to_string()).collect(),
                ..Default::default()
            },
            active: true,
            created_at: None,
            last_shown: None,
        }
    }

    #[test]
    fn list_previews_three_prizes() {
        let wheel = promo(PromotionKind::SpinWheel, &["a", "b", "c", "d"]);
        assert_eq!(prize_summary(&wheel), "Prizes: a, b, c...");

        let short = promo(PromotionKind::SpinWheel, &["a", "b", "c"]);
        assert_eq!(prize_summary(&short), "Prizes: a, b, c");

        let empty = promo(PromotionKind::SpinWheel, &[]);
        assert_eq!(prize_summary(&empty), "Prizes: Default prizes");

        let entries = promotion_entries(&[promo(PromotionKind::Banner, &[])]);
        assert_eq!(entries[0].title, "Untitled");
        assert_eq!(entries[0].summary, "Banner Ad Campaign");
    }

    #[test]
    fn countdown_runs_to_half_hour_boundary() {
        let at = |h, m, s| Utc.with_ymd_and_hms(2024, 1, 1, h, m, s).single().expect("valid time");
        assert_eq!(rotation_countdown(at(10, 0, 0)), "30:00");
        assert_eq!(rotation_countdown(at(10, 29, 59)), "00:01");
        assert_eq!(rotation_countdown(at(10, 45, 30)), "14:30");
    }

    #[test]
    fn spin_creator_validation() {
        assert_eq!(spin_wheel_promotion(" ", "a,b,c,d"), Err(PrizeListError::MissingTitle));
        assert_eq!(
            spin_wheel_promotion("Wheel", "a,b"),
            Err(PrizeListError::TooFewPrizes(2))
        );
        let promo = spin_wheel_promotion("Wheel", "").expect("defaults");
        assert_eq!(promo.content.prizes, vec!["10% OFF", "5% OFF", "Free Item", "Try Again"]);
    }

    #[test]
    fn empty_pool_message() {
        assert!(render_promotion_list(&[]).expect("render").contains("No active promotions."));
    }
}
