//! Prompt construction and decoding of the generator's reply.

use crate::model::GeneratedQuery;

/// Prompt asking for a single read-only query that answers `question`.
pub fn sql_generation_prompt(schema_description: &str, question: &str) -> String {
    format!(
        r#"You are an assistant that writes SQL queries for an IT asset management system.

{schema_description}
RULES:
1. Generate ONLY a single SELECT query. Never INSERT, UPDATE, DELETE, DROP or any other modification.
2. Use only the tables and columns listed above. Never reference any other column.
3. Use JOIN when data from several tables is needed.
4. Give computed columns clear aliases.
5. Limit results to at most 100 rows with LIMIT when no specific limit is requested.
6. Do not use comments, UNION or semicolons.
7. Filter dates with range comparisons instead of EXTRACT(... FROM ...).
8. If the question cannot be answered from this data, explain why.

USER QUESTION: "{question}"

Reply with JSON of the form:
{{
    "can_answer": true/false,
    "sql_query": "SELECT ... (when can_answer is true)",
    "explanation": "Short explanation of the query, or why the question cannot be answered",
    "expected_result_type": "single_value|list|table|count"
}}

Reply with the JSON only, without a markdown code block or extra commentary."#
    )
}

/// Prompt asking for a natural-language answer built from query rows.
pub fn format_prompt(question: &str, query: &GeneratedQuery, rows: &[serde_json::Value]) -> String {
    let results = serde_json::to_string_pretty(rows).unwrap_or_else(|_| "[]".to_string());
    format!(
        r#"You are an assistant answering questions about IT asset data in a friendly, informative way.

USER QUESTION: "{question}"

QUERY EXPLANATION: {explanation}

QUERY RESULTS (JSON):
{results}

RESULT TYPE: {result_type}

INSTRUCTIONS:
1. Answer in natural, easy to understand language.
2. Format dates in a readable form (for example: 15 January 2024).
3. Present lists as numbered lists.
4. If there is no data, say so politely.
5. Add relevant insight when useful.
6. Keep it short: at most 3-4 paragraphs or 10 list items.

Reply directly, without a markdown code block."#,
        explanation = query.explanation,
        result_type = query.expected_result_type,
    )
}

/// Prompt for questions that are not answered from the database.
pub fn general_prompt(message: &str) -> String {
    format!(
        r#"You are an assistant for an IT asset management system.
Answer the following question in a friendly, informative way.
If it concerns asset data, suggest asking specifically about:
- The number or list of assets
- Asset status (available, assigned, repair, retired, missing)
- Asset categories, locations or vendors
- Asset value or price
- Transaction or usage history

QUESTION: "{message}"

Keep the reply short and helpful."#
    )
}

/// Decode the generator's reply to [`sql_generation_prompt`].
///
/// A surrounding markdown code fence, with or without a `json` tag, is
/// stripped before decoding.
pub fn parse_generated_query(raw: &str) -> Result<GeneratedQuery, serde_json::Error> {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    serde_json::from_str(text.trim())
}
