//! Prompt templates. Placeholders are written `{{name}}`.

#[derive(Debug, Clone, Copy)]
pub struct PromptTemplates {
    pub summarize: &'static str,
    pub qa: &'static str,
    pub tool_guidance: &'static str,
    pub plan_gdelt: &'static str,
}

static PROMPTS: PromptTemplates = PromptTemplates {
    summarize: "\
You are a concise news assistant.
Summarize the following text in at most {{max_words}} words.
Keep key facts, figures and attributions. Do not speculate.

CONTENT START
{{text}}
CONTENT END",

    qa: "\
You are a news analyst.
Answer the user's question using ONLY the context below.
Cite URLs or sources explicitly when they are available.
If the context does not contain the answer, say that you don't know.

CONTEXT START
{{context}}
CONTEXT END

QUESTION: {{question}}",

    tool_guidance: "\
You can call tools to fetch and analyze news. Follow these rules:
- Use `gdelt_search(query, start_date?, end_date?, max_records?, languages?)`.
- Infer parameters from the user's request.
  - If a time window is mentioned, set start/end accordingly (YYYY-MM-DD).
  - If none is mentioned, prefer a recent window (for example the last 48h).
  - Include languages only when the user mentions them.
  - Keep max_records small (around 20) unless the user asks for more.
- Use `summarize_articles` when many results come back.
- Answer with `answer_question(question, articles)` grounded in the fetched articles.
- Prefer a few precise results over broad noisy sets.
- If the context is insufficient, search again with refined parameters.",

    plan_gdelt: "\
You are planning a GDELT Doc API search. Read the user's question and
output ONLY a JSON object with these keys:
- query (a cleaned boolean/news search string)
- start_date (YYYY-MM-DD or null)
- end_date (YYYY-MM-DD or null)
- languages (array of ISO language codes or null)
- max_records (integer)
Rules:
- infer dates when the question mentions them; otherwise leave them null.
- prefer boolean operators, quoted phrases and key entities in `query`.
- do not copy the user's text verbatim.
- keep `max_records` small (around 20) unless the user asks for more.",
};

impl PromptTemplates {
    pub fn get() -> &'static PromptTemplates {
        &PROMPTS
    }
}

/// Substitutes `{{name}}` placeholders in order.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{{{}}}}}", name), value)
    })
}
