//! Reusable prompts using Handlebars for templating. Handlebars adds
//! additional security controls since it can't do much out of the box
//! without registering your own helpers. Output is plain text sent to
//! the model so HTML escaping is turned off.

use std::fmt;

use handlebars::Handlebars;

/// Link every answer must point people to
pub const CALL_TO_ACTION_LINK: &str = "[Click Here](https://sponsorindex.setmore.com)";

pub const DISCLAIMER: &str = "Keep in mind these subscriber numbers and starting prices are approximate.\n**For specific details, past performance data, newsletter funnel tips, and a FREE Custom Proposal**, pick a time to speak to a representative. [Click Here](https://sponsorindex.setmore.com)";

#[derive(Debug)]
pub enum Prompt {
    Assistant,
    CategoryDetection,
    ContextQuestion,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

const ASSISTANT_PROMPT: &str = r"
You are a helpful AI assistant that provides information about newsletters. Format the response in a clear, structured way with categories, subscriber counts, prices, and audience information. Always include this disclaimer at the end of your response: '{{disclaimer}}'
";

const CATEGORY_DETECTION_PROMPT: &str = r"
You are a category detection system. Your task is to identify which category from the following list best matches the user's message. Respond with only the category name exactly as written. If no category matches well, respond with 'None'. Available categories: {{#each categories}}{{#if @index}}, {{/if}}{{this}}{{/each}}
";

const CONTEXT_QUESTION_PROMPT: &str = r"
Based on the following context about newsletters, please answer this question: {{message}}

Context:
{{context}}
";

pub fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry.register_escape_fn(handlebars::no_escape);
    registry
        .register_template_string(&Prompt::Assistant.to_string(), ASSISTANT_PROMPT)
        .expect("Failed to register template");
    registry
        .register_template_string(
            &Prompt::CategoryDetection.to_string(),
            CATEGORY_DETECTION_PROMPT,
        )
        .expect("Failed to register template");
    registry
        .register_template_string(&Prompt::ContextQuestion.to_string(), CONTEXT_QUESTION_PROMPT)
        .expect("Failed to register template");
    registry
}
