use crate::models::{GeneratedSlide, SlideDescriptor};
use crate::services::extract::{extract_candidate, validate_payload};
use crate::services::llm::Completion;
use std::sync::Arc;

/// Generate content for every selected slide concurrently.
///
/// One task per slide, launched up front; the only suspension point in a
/// task is the completion call. Tasks are awaited in spawn order so the
/// result keeps the ascending-number order of the input no matter how the
/// units actually finish. A failed or panicked unit becomes a fallback
/// slide; it never cancels the rest of the batch.
pub async fn generate_slides<C>(
    client: Arc<C>,
    slides: Vec<(usize, SlideDescriptor)>,
    outline: &str,
    total: usize,
    pitch_context: Option<&serde_json::Value>,
) -> Vec<GeneratedSlide>
where
    C: Completion + 'static,
{
    let outline: Arc<str> = Arc::from(outline);
    let guidance: Option<Arc<str>> = pitch_context.map(|v| Arc::from(v.to_string().as_str()));

    let mut handles = Vec::with_capacity(slides.len());
    for (rank, descriptor) in slides.iter() {
        let client = Arc::clone(&client);
        let outline = Arc::clone(&outline);
        let guidance = guidance.clone();
        let descriptor = descriptor.clone();
        let rank = *rank;
        handles.push(tokio::spawn(async move {
            generate_one(
                client.as_ref(),
                &descriptor,
                rank,
                total,
                &outline,
                guidance.as_deref(),
            )
            .await
        }));
    }

    let mut generated = Vec::with_capacity(handles.len());
    for (handle, (_, descriptor)) in handles.into_iter().zip(&slides) {
        let slide = match handle.await {
            Ok(slide) => slide,
            Err(e) => {
                tracing::error!(number = descriptor.number, error = %e, "generation task panicked");
                GeneratedSlide::fallback(descriptor, format!("generation task failed: {}", e))
            }
        };
        generated.push(slide);
    }

    generated
}

/// One unit of work: prompt, complete, extract, validate. Every failure
/// mode ends in a fallback slide with the error recorded on it.
async fn generate_one<C: Completion>(
    client: &C,
    descriptor: &SlideDescriptor,
    position: usize,
    total: usize,
    outline: &str,
    guidance: Option<&str>,
) -> GeneratedSlide {
    let prompt = build_prompt(descriptor, position, total, outline, guidance);

    let raw = match client.complete(&prompt).await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(number = descriptor.number, error = %e, "generation call failed");
            return GeneratedSlide::fallback(descriptor, format!("generation failed: {}", e));
        }
    };

    match extract_candidate(&raw).and_then(validate_payload) {
        Ok(payload) => {
            tracing::debug!(
                number = descriptor.number,
                blocks = payload.blocks.len(),
                "slide content generated"
            );
            GeneratedSlide::new(descriptor, payload)
        }
        Err(e) => {
            tracing::warn!(number = descriptor.number, error = %e, "generation output rejected");
            GeneratedSlide::fallback(descriptor, format!("invalid generation output: {}", e))
        }
    }
}

fn build_prompt(
    descriptor: &SlideDescriptor,
    position: usize,
    total: usize,
    outline: &str,
    guidance: Option<&str>,
) -> String {
    let mut prompt = format!(
        "You are writing content for one slide of a presentation.\n\nFull outline for context:\n{}\n\nWrite slide {} of {}: \"{}\" (slide number {}).\n",
        outline, position, total, descriptor.title, descriptor.number
    );

    if !descriptor.body.is_empty() {
        prompt.push_str(&format!(
            "Talking points for this slide:\n{}\n",
            descriptor.body
        ));
    }

    if let Some(guidance) = guidance {
        prompt.push_str(&format!("Presentation context: {}\n", guidance));
    }

    prompt.push_str(
        "\nRespond with a JSON object only: {\"blocks\": [{\"type\": \"title\" | \"subtitle\" | \"text\" | \"bullet\" | \"chart\" | \"table\" | \"image\", \"content\": string, \"data\": optional object for chart/table, \"style\": optional object}], \"notes\": optional string}. Include at least one block. Do not write anything outside the JSON object.",
    );

    prompt
}
