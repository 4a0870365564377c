//! Banner canvas for design mode.

use askama::Template;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::{NewPromotion, PromotionContent, PromotionKind},
    view::html::{HeadingPart, heading_parts, strip_tags},
};

pub const BANNER_TITLE_MAX: usize = 30;
pub const FALLBACK_BANNER_TITLE: &str = "Promo";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BannerPreset {
    pub title: &'static str,
    /// Heading markup; may contain `<br/>` and coloured spans.
    pub text: &'static str,
    pub subtext: &'static str,
    pub image: &'static str,
}

pub const TEMPLATES: [BannerPreset; 4] = [
    BannerPreset {
        title: "Fresh Deals",
        text: "FRESH<br/><span class='text-primary'>DEALS</span>",
        subtext: "Get up to 40% OFF on all seasonal organic vegetables today.",
        image: GRAPHICS[0],
    },
    BannerPreset {
        title: "Summer Sale",
        text: "SUMMER<br/><span class='text-yellow-400'>SALE</span>",
        subtext: "Cool down with our refreshing beverages. Buy 2 Get 1 Free!",
        image: "https://images.unsplash.com/photo-1560963689-02e0d7730e6e?w=800&auto=format&fit=crop&q=60",
    },
    BannerPreset {
        title: "Mega Offer",
        text: "MEGA<br/><span class='text-red-500'>OFFER</span>",
        subtext: "Huge discounts on all electronics and gadgets. Limited time only.",
        image: "https://images.unsplash.com/photo-1607082348824-0a96f2a4b9da?w=800&auto=format&fit=crop&q=60",
    },
    BannerPreset {
        title: "New Arrivals",
        text: "NEW<br/><span class='text-green-400'>ARRIVALS</span>",
        subtext: "Check out the latest fashion trends in our store now.",
        image: "https://images.unsplash.com/photo-1483985988355-763728e1935b?w=800&auto=format&fit=crop&q=60",
    },
];

/// Stock backgrounds, also the fallback chain for generated designs.
pub const GRAPHICS: [&str; 5] = [
    "https://lh3.googleusercontent.com/aida-public/AB6AXuBSOGf4Vm8zvhPyzdwVhUPo05LPP36PFUEB3SZVDuTYJE5iK58KKvTrsWEM0MjoKWBKz4xjBbVkohZg_Z5x-9etNg-_U1TWAWv0pDR-gI99fHq2Y8I-2uyNcl2qORZuu6BjYLvGlZXobnFz8WnjleQbLdJLeKyysAWs8d_7mCV22Vk-0cYk257EG48bsAHfJT1j0gI5yh7ILTTpchLOB2EbO17HueFWiMbRIyiJLCFPJtkmUxbxb5lvfti7OpUVzQrua2rPrlR5QGQ",
    "https://images.unsplash.com/photo-1550989460-0adf9ea622e2?w=800&auto=format&fit=crop&q=60",
    "https://images.unsplash.com/photo-1542838132-92c53300491e?w=800&auto=format&fit=crop&q=60",
    "https://images.unsplash.com/photo-1557683316-973673baf926?w=800&auto=format&fit=crop&q=60",
    "https://images.unsplash.com/photo-1557682250-33bd973ae291?w=800&auto=format&fit=crop&q=60",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DesignCanvas {
    pub text: String,
    pub subtext: String,
    pub image: String,
}

impl DesignCanvas {
    pub fn apply_template(&mut self, template: &BannerPreset) {
        self.text = template.text.to_string();
        self.subtext = template.subtext.to_string();
        self.image = template.image.to_string();
    }

    pub fn apply_graphic(&mut self, url: &str) {
        self.image = url.trim().to_string();
    }

    /// Heading with tags stripped, cut to 30 characters, `Promo` when empty.
    pub fn banner_title(&self) -> String {
        let plain: String = strip_tags(&self.text).chars().take(BANNER_TITLE_MAX).collect();
        if plain.trim().is_empty() {
            FALLBACK_BANNER_TITLE.to_string()
        } else {
            plain
        }
    }

    pub fn to_promotion(&self) -> NewPromotion {
        NewPromotion {
            kind: PromotionKind::Banner,
            title: self.banner_title(),
            content: PromotionContent {
                text: Some(self.text.clone()),
                image: Some(self.image.clone()),
                subtext: Some(self.subtext.clone()),
                prizes: Vec::new(),
            },
        }
    }
}

/// Candidate backgrounds for a generated design: the suggested image first,
/// then the stock graphics, trimmed, blanks and repeats dropped.
pub fn image_candidates(primary: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(GRAPHICS.len() + 1);
    for url in std::iter::once(primary).chain(GRAPHICS) {
        let url = url.trim();
        if !url.is_empty() && !out.iter().any(|u| u == url) {
            out.push(url.to_string());
        }
    }
    out
}

#[derive(Template)]
#[template(path = "design_canvas.html")]
struct CanvasTemplate<'a> {
    background: String,
    heading: Vec<HeadingPart>,
    subtext: &'a str,
}

pub fn render_canvas(canvas: &DesignCanvas) -> askama::Result<String> {
    let background = if canvas.image.is_empty() {
        "background-image: none".to_string()
    } else {
        format!("background-image: url('{}')", canvas.image.replace('\'', "%27"))
    };
    CanvasTemplate {
        background,
        heading: heading_parts(&canvas.text),
        subtext: &canvas.subtext,
    }
    .render()
}

struct TemplateTile {
    index: usize,
    title: &'static str,
    image: &'static str,
}

#[derive(Template)]
#[template(path = "design_templates.html")]
struct TemplatePicker {
    tiles: Vec<TemplateTile>,
}

pub fn render_templates() -> askama::Result<String> {
    let tiles = TEMPLATES
        .iter()
        .enumerate()
        .map(|(index, template)| TemplateTile {
            index,
            title: template.title,
            image: template.image,
        })
        .collect();
    TemplatePicker { tiles }.render()
}

#[derive(Template)]
#[template(path = "design_graphics.html")]
struct GraphicPicker {
    graphics: &'static [&'static str],
}

pub fn render_graphics() -> askama::Result<String> {
    GraphicPicker {
        graphics: &GRAPHICS,
    }
    .render()
}
