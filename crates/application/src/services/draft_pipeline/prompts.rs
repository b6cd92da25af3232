//! Prompts and fallback templates for the draft stages
//!
//! System prompts are fixed; everything specific to the prospect or the
//! sender goes into the user message.

use domain::{ProspectProfile, SenderProfile};

pub(crate) const SUBJECT_SYSTEM_PROMPT: &str = r#"You are an expert email subject line writer for B2B sales.
Create a compelling subject line that references the prospect's pain points and the sender's solution.
Respond in JSON format with a "subject" field containing your subject line.
Keep it under 50 characters."#;

pub(crate) const CONTENT_SYSTEM_PROMPT: &str = r#"You are an expert B2B sales email writer.
Create personalized email content and respond in JSON format with a "content" field.
The email should:
1. Show understanding of their pain points
2. Demonstrate how the sender's solution specifically solves their problems
3. Include relevant social proof
4. End with a clear call to action for a meeting
5. Keep it concise (max 150 words)"#;

pub(crate) const REFINE_SYSTEM_PROMPT: &str = r#"You are an expert email editor. You MUST respond with valid JSON in the following format:
{
    "refined_content": "your refined email text here",
    "needs_another_iteration": false
}

Important:
- Use proper JSON escaping for quotes and special characters
- Do not include any explanation text outside the JSON
- Ensure the JSON is properly formatted

Your task is to refine the email content focusing on:
1. Improving clarity and conciseness
2. Ensuring professional tone
3. Optimizing persuasiveness
4. Maintaining natural flow

Set "needs_another_iteration" to true only if the email still needs substantial work."#;

pub(crate) const FINAL_SYSTEM_PROMPT: &str = r#"You are an expert email formatter.
Format the email with proper greeting, signature, and professional structure.

RESPOND ONLY WITH THE FINAL EMAIL TEXT.
DO NOT USE JSON FORMAT.
DO NOT ADD ANY ADDITIONAL EXPLANATION OR FORMATTING."#;

fn prospect_block(prospect: &ProspectProfile) -> String {
    format!(
        "Prospect Information:\n\
         Name: {}\n\
         Role: {}\n\
         Company: {}\n\
         Pain Points: {}\n\
         Industry: {}\n\
         Solution Fit: {}\n\
         Insights: {}",
        prospect.author,
        prospect.role,
        prospect.company,
        prospect.pain_points_joined(),
        prospect.industry,
        prospect.solution_fit,
        prospect.insights,
    )
}

fn sender_line(sender: &SenderProfile) -> String {
    format!("Sender: {} ({})", sender.company, sender.solution)
}

pub(crate) fn subject_prompt(prospect: &ProspectProfile, sender: &SenderProfile) -> String {
    format!("{}\n\n{}", prospect_block(prospect), sender_line(sender))
}

pub(crate) fn content_prompt(
    prospect: &ProspectProfile,
    sender: &SenderProfile,
    subject: &str,
) -> String {
    format!(
        "{}\n\n{}\nSubject Line: {subject}",
        prospect_block(prospect),
        sender_line(sender)
    )
}

pub(crate) fn refine_prompt(prospect: &ProspectProfile, subject: &str, text: &str) -> String {
    format!(
        "Current Email:\n\
         Subject: {subject}\n\
         Content: {text}\n\n\
         Context:\n\
         Role: {}\n\
         Industry: {}",
        prospect.role, prospect.industry
    )
}

pub(crate) fn final_prompt(
    prospect: &ProspectProfile,
    sender: &SenderProfile,
    subject: &str,
    refined_content: &str,
) -> String {
    format!(
        "Email Components:\n\
         Subject: {subject}\n\
         Refined Content: {refined_content}\n\n\
         Prospect:\n\
         Name: {}\n\
         Role: {}\n\
         Company: {}\n\n\
         Sender Information:\n\
         Name: {}\n\
         Title: {}\n\
         Company: {}",
        prospect.author,
        prospect.role,
        prospect.company,
        sender.name,
        sender.title,
        sender.company,
    )
}

/// Body used when no content could be generated
pub(crate) fn fallback_content(prospect: &ProspectProfile, sender: &SenderProfile) -> String {
    format!(
        "Dear {},\n\n\
         I noticed your focus on {} at {}. {}'s {} directly addresses these challenges.\n\n\
         Could we schedule a brief call to discuss how {} has helped similar companies in the {} industry?\n\n\
         Best regards,\n{}",
        prospect.author,
        prospect.pain_points_joined(),
        prospect.company,
        sender.company,
        sender.solution,
        sender.company,
        prospect.industry,
        sender.signature(),
    )
}
