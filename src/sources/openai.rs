//! Language-model advice collaborator.
//!
//! Opaque from the core's point of view: a structured market payload goes
//! in, a `TradingAdvice` JSON comes out, or an error the caller may fall
//! back from.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::types::{MarketSnapshot, TradingAdvice};

const SYSTEM_PROMPT: &str = "You are a cryptocurrency trading expert. Analyze the \
provided market data, using the Fibonacci levels as reference, and respond in JSON \
with the optimal entry (buyTarget), stop loss (stopLoss) and take profit \
(takeProfit). The entry must not be above the current price. Respond with exactly \
this shape: {\"buyTarget\": \"...\", \"stopLoss\": \"...\", \"takeProfit\": \"...\", \
\"analysis\": {\"trend\": \"...\", \"technical\": \"...\", \"volume\": \"...\", \
\"conclusion\": \"...\"}}";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat client producing trading advice.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    /// Create a client when an API key is configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        let api_key = config.openai_api_key.clone()?;
        Some(Self {
            client: Client::builder()
                .user_agent("Augury/1.0")
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_key,
            model: config.openai_model.clone(),
            base_url: config.openai_base_url.clone(),
        })
    }

    /// Request advice for the given market snapshot.
    pub async fn advise(&self, snapshot: &MarketSnapshot) -> Result<TradingAdvice> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_prompt(snapshot),
                },
            ],
            temperature: 0.7,
            max_tokens: 500,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Advice(format!(
                "advice endpoint returned {}",
                response.status()
            )));
        }

        let chat: ChatResponse = response.json().await?;
        let content = chat
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or_else(|| AppError::Advice("advice response is empty".to_string()))?;

        debug!("advice endpoint returned {} bytes", content.len());
        parse_advice(content)
    }
}

/// Parse the model output into `TradingAdvice`, tolerating markdown fences.
fn parse_advice(content: &str) -> Result<TradingAdvice> {
    let stripped = content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let advice: TradingAdvice = serde_json::from_str(stripped)
        .map_err(|e| AppError::Advice(format!("advice response is not valid JSON: {}", e)))?;

    if !advice.is_complete() {
        return Err(AppError::Advice(
            "advice response is missing required fields".to_string(),
        ));
    }

    Ok(advice)
}

/// Render the snapshot into the user prompt.
fn build_prompt(snapshot: &MarketSnapshot) -> String {
    let historical = snapshot
        .historical
        .iter()
        .map(|h| {
            format!(
                "time: {}\n- price: ${:.2}\n- volume: {:.2}\n- RSI: {:.2}\n- MACD: {:.2}\n- Bollinger: upper ${:.2} / lower ${:.2}",
                h.time, h.price, h.volume, h.rsi, h.macd, h.bollinger_upper, h.bollinger_lower
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let fib = &snapshot.fibonacci_levels;

    format!(
        "Current {} market data:\n\n\
        Recent window:\n{}\n\n\
        Current price information:\n\
        - price: ${:.2}\n\
        - 24h change: {:.2}%\n\n\
        Fibonacci levels:\n\
        - 0%: ${:.2}\n- 23.6%: ${:.2}\n- 38.2%: ${:.2}\n- 50%: ${:.2}\n\
        - 61.8%: ${:.2}\n- 78.6%: ${:.2}\n- 100%: ${:.2}\n- 123.6%: ${:.2}\n- 150%: ${:.2}\n\n\
        Technical indicators:\n\
        - RSI (14): {:.2}\n\
        - MACD: {:.2}\n\
        - MA50: ${:.2}\n\
        - MA200: ${:.2}\n\
        - Bollinger bands: upper ${:.2} / lower ${:.2}\n\n\
        Volume analysis:\n\
        - current volume: {:.2}\n\
        - 24h volume change: {:.2}%\n\n\
        Market sentiment index: {:.2}\n\n\
        Additional indicators:\n\
        - Stochastic: K({:.2}), D({:.2})\n\
        - OBV: {:.2}\n\n\
        Chart patterns (confidence {:.0}%):\n\
        - doji: {}\n- morning star: {}\n- hammer: {}\n\n\
        Order book:\n\
        - buy pressure: {:.2}\n\
        - sell pressure: {:.2}\n\n\
        Futures market:\n\
        - funding rate: {:.4}%\n\
        - open interest: {:.2}",
        snapshot.symbol,
        historical,
        snapshot.price,
        snapshot.price_change_24h,
        fib.level0,
        fib.level236,
        fib.level382,
        fib.level500,
        fib.level618,
        fib.level786,
        fib.level1000,
        fib.level1236,
        fib.level1500,
        snapshot.rsi,
        snapshot.macd,
        snapshot.ma50,
        snapshot.ma200,
        snapshot.bands.upper,
        snapshot.bands.lower,
        snapshot.volume,
        snapshot.volume_change_24h,
        snapshot.market_sentiment,
        snapshot.stochastic.k,
        snapshot.stochastic.d,
        snapshot.obv,
        snapshot.pattern_confidence,
        snapshot.price_patterns.is_doji,
        snapshot.price_patterns.is_morning_star,
        snapshot.price_patterns.is_hammer,
        snapshot.market_depth.buy_pressure,
        snapshot.market_depth.sell_pressure,
        snapshot.funding_rate,
        snapshot.open_interest,
    )
}
