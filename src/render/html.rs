use minijinja::Environment;

use crate::error::CardError;
use crate::view::ViewModel;

const CARD_TEMPLATE: &str = "card.html";

/// Renders a view into card markup, using `<ha-icon>` as the icon primitive.
pub struct HtmlRenderer {
    env: Environment<'static>,
}

impl HtmlRenderer {
    pub fn new() -> Result<Self, CardError> {
        let mut env = Environment::new();
        env.add_template(CARD_TEMPLATE, include_str!("../../templates/card.html"))?;
        Ok(Self { env })
    }

    pub fn render(&self, view: &ViewModel) -> Result<String, CardError> {
        let template = self.env.get_template(CARD_TEMPLATE)?;
        Ok(template.render(view)?)
    }
}
