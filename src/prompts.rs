//! Prompt builders for the two conversation phases.

use crate::error::Result;
use crate::models::{AnswerMap, ToneHints, level_text};

/// Phase 1 prompt: classify the topic and ask 3–5 clarifying questions as JSON.
pub fn analysis_prompt(topic: &str) -> String {
    format!(
        r#"A user wants to write a LinkedIn post, story, or presentation script about the following topic: "{topic}".
Analyze the user's topic to understand its context (for example: a personal achievement, a technical explanation, a project launch, a career milestone).
Based on your analysis, generate 3 to 5 essential and specific follow-up questions that will help the user provide the details needed to build a compelling narrative.

IMPORTANT: Your response MUST be a single valid JSON object with exactly one key "questions", whose value is an array of strings. Do not add any other text or markdown.
Example: {{"questions": ["What was your specific role?", "What was the biggest challenge?"]}}
"#
    )
}

/// Phase 2 prompt: persona and narrative instructions around the topic and the verbatim answers.
pub fn persona_prompt(topic: &str, answers: &AnswerMap, tone: &ToneHints) -> Result<String> {
    let details = answers.to_pretty_json()?;

    let mut prompt = format!(
        r#"Act as a world-class persuasion expert and narrative strategist who writes high-performing LinkedIn posts.
Turn the user's accomplishment into a story: open with a hook, show the stakes and the struggle, land the result, and close with a takeaway the reader can use.

User's Core Topic: "{topic}"
User's Detailed Answers: {details}
"#
    );

    if let Some(emotion) = &tone.emotion {
        prompt.push_str(&format!("Emotionality Level: {}/100.\n", level_text(emotion)));
    }
    if let Some(urgency) = &tone.urgency {
        prompt.push_str(&format!("Urgency/FOMO Level: {}/100.\n", level_text(urgency)));
    }

    prompt.push_str(
        r#"
Generate the post now.

IMPORTANT INSTRUCTIONS:
1. Your response must ONLY be the text for the LinkedIn post itself.
2. Do NOT include any commentary, analysis, or explanations like "Why this works."
3. Do NOT add any introductory text like "Here is the post you requested:".
4. Start the response directly with the post's headline and end it with the hashtags.
"#,
    );

    Ok(prompt)
}
