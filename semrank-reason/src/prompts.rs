//! Prompt templates for explanation and classification.

/// System prompt for ticket classification.
pub const CLASSIFY_SYSTEM_PROMPT: &str = "\
You are an expert IT support analyst. You categorize incoming support \
tickets, assess their priority and technical complexity, and route them to \
the team with the right expertise, using historical similar tickets as \
context. Base your analysis on the historical patterns provided, the \
technical nature of the issue, and its business impact. Be consistent with \
historical outcomes while adapting to what is unique about the new ticket.";

/// Build the user prompt asking for a structured classification.
///
/// `context` is the block produced by
/// [`build_match_context`](crate::context::build_match_context); it may be
/// empty when no similar history exists.
pub fn classification_prompt(query: &str, context: &str) -> String {
    format!(
        "{context}\n\n\
         === NEW SUPPORT TICKET TO ANALYZE ===\n\
         {query}\n\n\
         === ANALYSIS REQUEST ===\n\
         Based on the historical matches above (if any) and the technical \
         nature of this ticket, respond with your analysis in this exact \
         JSON structure and nothing else:\n\
         {{\n\
             \"category\": \"primary category based on issue type\",\n\
             \"subcategory\": \"specific subcategory\",\n\
             \"priority\": \"P1/P2/P3/P4\",\n\
             \"assigned_team\": \"team with best expertise match\",\n\
             \"technical_complexity\": \"critical/high/medium/low\",\n\
             \"required_expertise\": [\"specific\", \"skills\", \"needed\"],\n\
             \"escalation_required\": false,\n\
             \"reasoning\": \"explanation referencing similar tickets\",\n\
             \"confidence_score\": 0.85,\n\
             \"immediate_actions\": [\"first action\", \"second action\"]\n\
         }}"
    )
}

/// Build the user prompt asking for a short free-text match explanation.
pub fn explanation_prompt(query: &str, matched_chunks: &str) -> String {
    format!(
        "You are an expert project matcher. Analyze the provided project and \
         interest information for two parties and explain concisely why they \
         are a good match, highlighting the most significant keywords and \
         concepts that create the match.\n\n\
         Provided Context:\n\
         - User Prompt: {query}\n\
         - Matched Profile Content: {matched_chunks}\n\n\
         Generate a brief, easy-to-read explanation (2-3 sentences max) \
         highlighting the key points of connection."
    )
}
