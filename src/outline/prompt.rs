//! Prompt construction for deck outlines
//!
//! Both blocks are pure functions of the founder input, so the same input
//! always produces the same prompt.

use crate::outline::input::FounderInput;

/// Version tag the model is asked to echo in `meta.prompt_version`.
pub const PROMPT_VERSION: &str = "v1";

/// JSON template the model fills in.
pub const SCHEMA_TEMPLATE: &str = r#"{
  "deck": {
    "meta": {
      "startup": "<string>",
      "industry": "<string>",
      "stage": "seed",
      "tone": "<crisp|narrative|technical>",
      "prompt_version": "v1",
      "created_at": "<ISO8601>"
    },
    "slides": [{
      "id": 1,
      "title": "<Title Case>",
      "purpose": "<investor question this slide answers>",
      "bullets": ["<12-20 words>", "<3-5 bullets total>"],
      "visual": "<suggested chart/mock/layout>",
      "proof_needed": ["<evidence item 1>", "<2-4 items>"]
    }],
    "proof_todos": ["<global TODOs founders must supply, max 8>"],
    "warnings": ["<any caveats or missing info>"]
  }
}"#;

/// Instruction block encoding the output contract.
pub fn system_prompt() -> String {
    "You are a seed-stage, investor-grade pitch deck outliner.\n\
Return ONLY valid JSON that follows the schema. No prose, no markdown.\n\
Rules:\n\
- 10-12 slides. Each slide answers a real investor question.\n\
- 3-5 bullets per slide, 12-20 words each. No fluff.\n\
- Do NOT invent numbers, names, customers or metrics. When a fact is missing,\n\
  list the evidence required in that slide's proof_needed and in proof_todos.\n\
- Seed bar: prove pull, a wedge, and a path to revenue in 12-18 months.\n\
- Titles in Title Case. Visuals are concrete (e.g. \"cohort chart\").\n\
- Write in the requested tone (crisp, narrative or technical); default to crisp.\n\
- Every schema field must exist."
        .to_string()
}

/// Extra instructions appended after a truncated first attempt.
pub fn compact_addendum() -> &'static str {
    "COMPACT MODE: the previous answer ran out of space.\n\
- Use exactly 10 slides.\n\
- 3 bullets per slide, at most 14 words each.\n\
- At most 2 proof_needed items per slide and 5 proof_todos.\n\
- Phrase everything tightly. Move missing detail into warnings or proof_todos\n\
  instead of expanding slides.\n\
- The JSON must be complete and closed."
}

/// Instruction block for the compact retry.
pub fn compact_system_prompt() -> String {
    format!("{}\n\n{}", system_prompt(), compact_addendum())
}

/// User block: schema template, every founder field and the task directive.
pub fn user_prompt(input: &FounderInput) -> String {
    format!(
        "SCHEMA:\n\
{schema}\n\
\n\
FOUNDER_INPUT:\n\
startup: {startup}\n\
one_liner: {one_liner}\n\
industry: {industry}\n\
stage: seed\n\
target_user: {target_user}\n\
problem: {problem}\n\
solution: {solution}\n\
gtm: {gtm}\n\
business_model: {business_model}\n\
traction: {traction}\n\
competition: {competition}\n\
moat: {moat}\n\
ask_use: {ask_use}\n\
tone: {tone}\n\
\n\
TASK:\n\
Produce a 10-12 slide outline for seed investors.\n\
Each slide: title, purpose, 3-5 bullets, visual, and 2-4 proof_needed.\n\
Aggregate the most critical missing evidence into proof_todos (max 8).\n\
Set meta.prompt_version to \"{version}\".\n\
Return ONLY valid JSON.",
        schema = SCHEMA_TEMPLATE,
        startup = input.startup,
        one_liner = input.one_liner,
        industry = input.industry,
        target_user = input.target_user,
        problem = input.problem,
        solution = input.solution,
        gtm = input.gtm,
        business_model = input.business_model,
        traction = input.traction,
        competition = input.competition,
        moat = input.moat,
        ask_use = input.ask_use,
        tone = input.tone,
        version = PROMPT_VERSION,
    )
}
