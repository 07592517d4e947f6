use poise::serenity_prelude as serenity;

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x2e_cc_71;

/// Field name used when a field should render without a visible heading.
pub const BLANK_FIELD_NAME: &str = "\u{200b}";

/// A single embed field as produced by a renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline,
        }
    }
}

/// Platform independent description of an embed.
///
/// Renderers return this value instead of mutating a shared builder, which
/// keeps page rendering pure and lets tests compare whole pages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderedEmbed {
    pub title: String,
    pub description: String,
    pub fields: Vec<EmbedField>,
    pub footer: Option<String>,
}

impl RenderedEmbed {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(EmbedField::new(name, value, inline));
        self
    }

    pub fn footer(mut self, text: impl Into<String>) -> Self {
        self.footer = Some(text.into());
        self
    }

    #[cfg(test)]
    pub(crate) fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|field| field.name.as_str()).collect()
    }
}

/// Build the serenity embed for a rendered page with consistent styling.
pub fn build_rendered_embed(rendered: &RenderedEmbed) -> serenity::CreateEmbed {
    let builder = serenity::CreateEmbed::new()
        .title(rendered.title.clone())
        .color(DEFAULT_EMBED_COLOR)
        .description(rendered.description.clone())
        .fields(
            rendered
                .fields
                .iter()
                .map(|field| (field.name.clone(), field.value.clone(), field.inline)),
        );

    match rendered.footer.as_deref() {
        Some(text) if !text.is_empty() => {
            builder.footer(serenity::CreateEmbedFooter::new(text.to_owned()))
        }
        _ => builder,
    }
}
