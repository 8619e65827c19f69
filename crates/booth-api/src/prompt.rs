//! Prompt building for submissions that carry the legacy profile fields
//! instead of a resolved prompt.

/// Builds the dress-uniform portrait prompt from the legacy fields.
///
/// The subject is "man" only for `male`; any other value, including none,
/// yields "woman".
#[must_use]
pub fn legacy_portrait_prompt(sex: Option<&str>, title: &str, modifier: Option<&str>) -> String {
    let subject = if sex == Some("male") { "man" } else { "woman" };
    let modifier = modifier.unwrap_or_default();
    format!(
        "Transform this person into a professional portrait of a {subject} as a US Army {title}. \
         Keep the person's face and features exactly the same but dress them in military dress \
         uniform with medals and insignia. {modifier}. American flag in background, studio \
         lighting, photorealistic, highly detailed, sharp focus, professional military portrait \
         photography, 8k quality. Maintain facial identity and likeness."
    )
}
