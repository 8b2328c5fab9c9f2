// Prompt for a single round of two truths and a lie.
// The system message comes from llm_client::prompts::JSON_ONLY_SYSTEM.

/// User prompt asking for one fact set. Topic is left to the model.
pub const FACT_SET_PROMPT: &str = r#"You generate rounds for a trivia game called "Two Truths and a Lie".
Pick a random, interesting topic and write 3 statements about it.
Exactly 2 statements must be TRUE and exactly 1 statement must be FALSE.

Requirements:
- The false statement must be subtle and plausible, not obviously wrong.
- The true statements must be correct but somewhat obscure.
- Do NOT use widely known facts (e.g. "The sky is blue").
- Every statement carries a short explanation that is shown after the player guesses.

Return a JSON object with this EXACT schema (no extra fields):
{
  "facts": [
    {"statement": "<string>", "truth_value": "<True or False>", "explanation": "<string>"},
    {"statement": "<string>", "truth_value": "<True or False>", "explanation": "<string>"},
    {"statement": "<string>", "truth_value": "<True or False>", "explanation": "<string>"}
  ]
}

Example of a good round:
{
  "facts": [
    {
      "statement": "The French invented French fries in the 17th century.",
      "truth_value": "False",
      "explanation": "Despite the name, French fries most likely originated in Belgium, and there is no firm record tracing them to 17th-century France."
    },
    {
      "statement": "Some power outages in the United States are caused by squirrels.",
      "truth_value": "True",
      "explanation": "Squirrels chew through lines and short out transformers, causing localized outages."
    },
    {
      "statement": "The Australians declared war on emus twice.",
      "truth_value": "True",
      "explanation": "In 1932 the Australian military ran the 'Great Emu War' against emus damaging farmland, with at least two separate attempts to cull them."
    }
  ]
}

Respond with valid JSON only. Do not wrap the output in triple backticks or any other Markdown formatting."#;
