//! The language model capability.
//!
//! [`LanguageModel`] is what the chat service talks to. Most deployments
//! only have a raw text completion endpoint; wrap it in a [`TextGenerator`]
//! and hand it to [`PromptedModel`], which supplies the prompts and decodes
//! the replies.

use crate::prompt::{format_prompt, general_prompt, parse_generated_query, sql_generation_prompt};
use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape of the answer the generator expects a query to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultType {
    SingleValue,
    List,
    #[default]
    Table,
    Count,
    #[serde(other)]
    Other,
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResultType::SingleValue => "single_value",
            ResultType::List => "list",
            ResultType::Table => "table",
            ResultType::Count => "count",
            ResultType::Other => "other",
        };
        write!(f, "{}", s)
    }
}

/// The generator's answer to a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedQuery {
    /// Whether the question can be answered from the database.
    pub can_answer: bool,

    /// Candidate SQL. Untrusted until it passes the guard.
    #[serde(default)]
    pub sql_query: Option<String>,

    /// What the query does, or why the question cannot be answered.
    #[serde(default)]
    pub explanation: String,

    #[serde(default)]
    pub expected_result_type: ResultType,
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Propose a query answering `question`, grounded in `schema_description`.
    async fn generate_sql(
        &self,
        question: &str,
        schema_description: &str,
    ) -> anyhow::Result<GeneratedQuery>;

    /// Turn query rows into a natural-language answer.
    async fn format_response(
        &self,
        question: &str,
        query: &GeneratedQuery,
        rows: &[serde_json::Value],
    ) -> anyhow::Result<String>;

    /// Answer without consulting the database.
    async fn general_chat(&self, message: &str) -> anyhow::Result<String>;
}

/// A raw text completion endpoint.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}

/// [`LanguageModel`] built on a [`TextGenerator`] and the prompts in
/// [`crate::prompt`].
pub struct PromptedModel<G> {
    generator: G,
}

impl<G: TextGenerator> PromptedModel<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl<G: TextGenerator> LanguageModel for PromptedModel<G> {
    async fn generate_sql(
        &self,
        question: &str,
        schema_description: &str,
    ) -> anyhow::Result<GeneratedQuery> {
        let prompt = sql_generation_prompt(schema_description, question);
        let raw = self.generator.complete(&prompt).await?;
        parse_generated_query(&raw).context("generator reply is not a query description")
    }

    async fn format_response(
        &self,
        question: &str,
        query: &GeneratedQuery,
        rows: &[serde_json::Value],
    ) -> anyhow::Result<String> {
        let prompt = format_prompt(question, query, rows);
        self.generator.complete(&prompt).await
    }

    async fn general_chat(&self, message: &str) -> anyhow::Result<String> {
        self.generator.complete(&general_prompt(message)).await
    }
}
