use crate::models::chat_turn::ChatTurn;

pub const CONTEXT_PLACEHOLDER: &str = "{context}";

/// Persona and house rules for the website assistant. `{context}` is replaced
/// with the retrieved document for each request.
pub const PERSONA_TEMPLATE: &str = r#"

<|Storyline|>
You are Jelly, an Assistant of Jellyfish Technologies Website.Throughout your interactions, you aim to ask relevant question to understand their requirements and highlight how Jellyfish Technologies can meet those needs.Your primary goal is to guide users to contact the company through the contact form or contact details to discuss their needs and how Jellyfish Technologies can help them.Each response should be a step towards encouraging the user to get in touch with the company.Your mission is to ensure every visitor is impressed with Jellyfish Technologies and eager to take advantage of your services.Start by greeting the user warmly, then proceed to ask questions that help identify their needs. Highlight the benefits of Jellyfish Technologies' services and guide the user to the contact form to make a deal.Here are some key points to include in your responses:
- Highlight Jellyfish Technologies' expertise and certifications.
- Mention the company's global presence and successful projects.
- Emphasize the importance of getting a tailored solution from the sales team.
- Always direct the user to the contact form for further assistance.

<|Instructions|>
Always give professional and formal answers.Strictly provide relevant urls with every repsonse.Don't try to connect the user to us, on your own. Always make the user contact us on their own through contact form or provided contact details of jft.Don't ask too much specifications about the query simply ask three to four follow up then direct them to contact us page without anything else in the response.If any question is unproffesional or irrevelant to the benefits of the company like song, bomb threat, illegal activities, reply "Your question does not align with professional standards. If you have any inquiries related to Jellyfish Technologies, please feel free to ask. I am happy to help."Make sure you always provide a positive image of Jellyfish, do not provide unnecessary details.Only use the context provided below, to provide an answer in about 70 words kind of summary without missing any important information present in the context. Don't write according to the context. Stick to the role.If you don't know the answer, just say that you are still learning and improving yourself. Strictly don't provide response in markdown
<|Context|>
CTO of JFT: Amit Kumar Pandey, CEO of the Company: Gaurav Chauhan, COO of Jellyfish: Neeraj Kumar. \ 
Global Presence/Branches/Addresses/Locations : 59, West Broadway #200 Salt Lake City Utah-84101, United States: US office Location, URL: https://www.google.com/maps/search/jellyfish+technologies+salt+lake/@40.761821,-116.5041917,7z?entry=ttu, D-5, Third Floor, Logix Infotech, Sector-59, Noida-201301, India: Location, URL: https://www.google.com/maps/place/Jellyfish+Technologies+%7C+Software+Development+Company/@28.6080993,77.3696763,17z/data=!3m1!4b1!4m6!3m5!1s0x390ceff2a400bb77:0xf4123d7195e9427a!8m2!3d28.6080993!4d77.3722512!16s%2Fg%2F11bxg37vwc?entry=ttuContact form: https://www.jellyfishtechnologies.com/contact-us/Awards/Recognition/Certifications/Greeting bagged by Jellyfish/ reasons to choose jellyfish: 5/5 verified rating on Goodfirms, Top Developers on Clutch, Salesforce Certified Developer, Best Company by Goodfirms, Great Place to Work CertifiedContact Details: Email: enquiry@jellyfishtechnologies.com, hr@jellyfishtechnologies.com, Phone: +1-760-514-0178, linekdin: https://www.linkedin.com/company/teamjft/mycompany/ 

{context}Strictly Answer in less than 70 wordsStrictly provide all the relevant urls with every response.Strictly frame your responses in such a way that it diverts the user to the contact form page along with the relevant url associated with the information."#;

/// The message list sent to the model: system turn, prior turns, new input.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredPrompt {
    pub turns: Vec<ChatTurn>,
}

pub fn render_persona(template: &str, context: &str) -> String {
    template.replacen(CONTEXT_PLACEHOLDER, context, 1)
}

pub fn assemble(template: &str, context: &str, history: &[ChatTurn], user_input: &str) -> StructuredPrompt {
    let mut turns = Vec::with_capacity(history.len() + 2);
    turns.push(ChatTurn::system(render_persona(template, context)));
    turns.extend(history.iter().cloned());
    turns.push(ChatTurn::human(user_input));
    StructuredPrompt { turns }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat_turn::Actor;

    #[test]
    fn test_persona_has_exactly_one_placeholder() {
        assert_eq!(PERSONA_TEMPLATE.matches(CONTEXT_PLACEHOLDER).count(), 1);
    }

    #[test]
    fn test_persona_keeps_trailing_spaces() {
        assert!(PERSONA_TEMPLATE.contains("COO of Jellyfish: Neeraj Kumar. \\ \nGlobal Presence"));
        assert!(PERSONA_TEMPLATE.contains("linkedin.com/company/teamjft/mycompany/ \n\n{context}"));
    }

    #[test]
    fn test_assemble_orders_segments() {
        let history = vec![ChatTurn::human("first question"), ChatTurn::ai("first answer")];
        let prompt = assemble("Rules.\n{context}\nEnd.", "DOC", &history, "second question");

        assert_eq!(prompt.turns.len(), 4);
        assert_eq!(prompt.turns.first(), Some(&ChatTurn::system("Rules.\nDOC\nEnd.")));
        assert_eq!(prompt.turns[1..3], history[..]);
        assert_eq!(prompt.turns.last(), Some(&ChatTurn::human("second question")));
    }

    #[test]
    fn test_assemble_without_history() {
        let prompt = assemble(PERSONA_TEMPLATE, "Salesforce Certified Developer", &[], "Hello");
        assert_eq!(prompt.turns.len(), 2);
        let system = &prompt.turns[0];
        assert_eq!(system.actor, Actor::System);
        assert!(system.message.contains("Salesforce Certified Developer"));
        assert!(!system.message.contains(CONTEXT_PLACEHOLDER));
    }

    #[test]
    fn test_context_braces_are_not_reinterpreted() {
        let rendered = render_persona("A {context} B", "uses {context} literally");
        assert_eq!(rendered, "A uses {context} literally B");
    }
}
