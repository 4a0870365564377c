//! Chat widgets: the admin assistant proxies `/chat`, the worker assistant
//! answers locally from the product list it already has.

use askama::Template;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    models::Product,
    view::inventory::WORKER_LOW_STOCK,
};

pub const CONNECTION_TROUBLE: &str = "Sorry, I am having trouble connecting to the server.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ChatLog {
    pub messages: Vec<ChatMessage>,
}

impl ChatLog {
    pub fn push(&mut self, sender: Sender, text: impl Into<String>) {
        self.messages.push(ChatMessage {
            sender,
            text: text.into(),
        });
    }

    pub fn last_reply(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.sender == Sender::Bot)
            .map(|m| m.text.as_str())
    }
}

/// Rule-based worker assistant. First matching keyword wins.
pub fn worker_reply(text: &str, products: &[Product]) -> String {
    let text = text.to_lowercase();
    if text.contains("hello") || text.contains("hi") {
        return "Hello! How can I help you today?".to_string();
    }
    if text.contains("stock") {
        let low = products.iter().filter(|p| p.stock < WORKER_LOW_STOCK).count();
        return format!(
            "We have {} products total. There are {low} items with low stock.",
            products.len()
        );
    }
    if text.contains("price") {
        return "You can check prices in the \"Price\" column of the inventory table.".to_string();
    }
    if text.contains("add") {
        return "To add a product, click the \"Add Product\" tab at the top.".to_string();
    }
    if text.contains("thank") {
        return "You're welcome! Happy working! 🚀".to_string();
    }
    "I can verify stock levels, item prices, or help you add products. Try asking \"How is the stock?\""
        .to_string()
}

struct MessageRow<'a> {
    class: &'static str,
    text: &'a str,
}

#[derive(Template)]
#[template(path = "chat.html")]
struct ChatTemplate<'a> {
    messages: Vec<MessageRow<'a>>,
}

pub fn render_chat(log: &ChatLog) -> askama::Result<String> {
    let messages = log
        .messages
        .iter()
        .map(|message| MessageRow {
            class: match message.sender {
                Sender::User => "message user",
                Sender::Bot => "message bot",
            },
            text: &message.text,
        })
        .collect();
    ChatTemplate { messages }.render()
}
