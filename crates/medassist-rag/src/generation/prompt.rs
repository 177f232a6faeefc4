//! Prompt templates for general and document-grounded answers

use crate::providers::Prompt;

const GENERAL_SYSTEM_PROMPT: &str = "You are a knowledgeable and empathetic medical assistant. \
Always respond in a clear, structured format using bullet points. Your answers must:
- Be concise, accurate, and medically relevant.
- Use clear section headers in bold (e.g., **Causes**, **Symptoms**, **Treatment**, **Prevention**).
- Under each section, list items as bullet points with short explanations.
- Ensure spacing and alignment are neat for easy readability.
- Avoid long paragraphs; focus on point-wise formatting.
If the question is about lifestyle or health habits, structure the response under:
• **What to avoid**
• **When to avoid**
• **Why to avoid**
Make the answer look like a well-formatted medical note.";

const GROUNDED_SYSTEM_PROMPT: &str = "You are a knowledgeable and empathetic medical assistant.
You have access to an uploaded medical document as well as general medical knowledge.
Rules:
- If the document contains relevant information, use it in your answer.
- If the document is not relevant, fall back to your general medical expertise.
- Always answer in structured bullet points with clear section headers.

Here is the document context (if relevant):
";

/// Prompt builder for medical questions
pub struct PromptBuilder {
    temperature: f32,
}

impl PromptBuilder {
    /// Create a builder producing prompts at `temperature`
    pub fn new(temperature: f32) -> Self {
        Self { temperature }
    }

    /// Prompt answered from general medical knowledge
    pub fn general(&self, question: &str) -> Prompt {
        Prompt {
            system: GENERAL_SYSTEM_PROMPT.to_string(),
            user: format!("Question: {}", question),
            temperature: self.temperature,
        }
    }

    /// Prompt carrying retrieved document context in the system turn
    pub fn grounded(&self, question: &str, context: &str) -> Prompt {
        Prompt {
            system: format!("{}{}", GROUNDED_SYSTEM_PROMPT, context),
            user: question.to_string(),
            temperature: self.temperature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_prompt() {
        let prompt = PromptBuilder::new(0.0).general("What causes migraines?");

        assert_eq!(prompt.user, "Question: What causes migraines?");
        assert!(prompt.system.contains("**What to avoid**"));
        assert!(prompt.system.starts_with("You are a knowledgeable and empathetic medical assistant."));
        assert_eq!(prompt.temperature, 0.0);
    }

    #[test]
    fn test_grounded_prompt_injects_context() {
        let prompt = PromptBuilder::new(0.0).grounded("Dose?", "Take 5mg daily.\n\nAvoid alcohol.");

        assert_eq!(prompt.user, "Dose?");
        assert!(prompt
            .system
            .ends_with("Here is the document context (if relevant):\nTake 5mg daily.\n\nAvoid alcohol."));
        assert!(prompt.system.contains("fall back to your general medical expertise"));
    }
}
