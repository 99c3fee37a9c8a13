use crate::models::{SlideDescriptor, SlideRef};
use anyhow::{Result, bail};
use regex::Regex;
use std::collections::HashSet;

// Heading convention: "# Slide 3: Title", "## 2 - Title", "#4. Title".
const HEADING_PATTERN: &str = r"(?i)^\s*#+\s*(?:slide\s*)?(\d+)\s*[:.\-)]?\s*(.*)$";

// List convention: "3. Title" or "3) Title"; titles only, no body capture.
const LIST_PATTERN: &str = r"^\s*(\d+)[.)]\s+(.+)$";

/// Extract slide descriptors from an outline, sorted ascending by number.
///
/// The heading-style scan runs first. Only when it finds fewer slides than
/// the caller requested does the list-style scan run as well, filling in
/// numbers the heading scan missed; heading descriptors win on collision.
/// Outlines are free text and authors mix both conventions, so a requested
/// slide must never be dropped when either scan can locate it.
pub fn parse_outline(text: &str, requested_count: usize) -> Vec<SlideDescriptor> {
    let mut slides = scan_headings(text);

    if slides.len() < requested_count {
        let found: HashSet<u32> = slides.iter().map(|s| s.number).collect();
        let extra = scan_list_items(text);
        tracing::debug!(
            heading_count = slides.len(),
            list_count = extra.len(),
            requested = requested_count,
            "heading scan came up short, merging list-style slides"
        );
        slides.extend(extra.into_iter().filter(|s| !found.contains(&s.number)));
    }

    slides.sort_by_key(|s| s.number);
    slides
}

fn scan_headings(text: &str) -> Vec<SlideDescriptor> {
    let Ok(heading) = Regex::new(HEADING_PATTERN) else {
        return Vec::new();
    };

    let mut slides: Vec<SlideDescriptor> = Vec::new();
    let mut current: Option<SlideDescriptor> = None;
    let mut body: Vec<&str> = Vec::new();

    for line in text.lines() {
        let parsed_heading = heading.captures(line).and_then(|caps| {
            let number: u32 = caps[1].parse().ok()?;
            let title = match caps.get(2).map(|m| m.as_str().trim()) {
                Some(t) if !t.is_empty() => t.to_string(),
                _ => format!("Slide {}", number),
            };
            Some((number, title))
        });

        match parsed_heading {
            Some((number, title)) => {
                if let Some(slide) = current.take() {
                    push_unique(&mut slides, flush(slide, &mut body));
                }
                current = Some(SlideDescriptor {
                    number,
                    title,
                    body: String::new(),
                });
            }
            None => {
                if current.is_some() {
                    body.push(line);
                }
            }
        }
    }

    if let Some(slide) = current.take() {
        push_unique(&mut slides, flush(slide, &mut body));
    }

    slides
}

fn flush(mut slide: SlideDescriptor, body: &mut Vec<&str>) -> SlideDescriptor {
    slide.body = body.join("\n").trim().to_string();
    body.clear();
    slide
}

fn scan_list_items(text: &str) -> Vec<SlideDescriptor> {
    let Ok(item) = Regex::new(LIST_PATTERN) else {
        return Vec::new();
    };

    let mut slides: Vec<SlideDescriptor> = Vec::new();
    for line in text.lines() {
        if let Some(caps) = item.captures(line) {
            if let Ok(number) = caps[1].parse::<u32>() {
                push_unique(
                    &mut slides,
                    SlideDescriptor {
                        number,
                        title: caps[2].trim().to_string(),
                        body: String::new(),
                    },
                );
            }
        }
    }
    slides
}

// Numbers are unique within one parse; the first occurrence wins.
fn push_unique(slides: &mut Vec<SlideDescriptor>, slide: SlideDescriptor) {
    if !slides.iter().any(|s| s.number == slide.number) {
        slides.push(slide);
    }
}

pub struct Selection {
    /// Selected descriptors paired with their 1-based rank within the full
    /// parsed deck, so "slide X of N" frames X and N against the same deck.
    pub slides: Vec<(usize, SlideDescriptor)>,
    /// Total descriptors parsed from the outline.
    pub total: usize,
}

/// Filter the parsed descriptors down to the numbers the caller asked for.
///
/// Zero matches is a hard error for the whole request; a partial match is
/// not (missing numbers are silently absent from the result).
pub fn select_slides(descriptors: &[SlideDescriptor], refs: &[SlideRef]) -> Result<Selection> {
    let wanted: HashSet<u32> = refs.iter().map(SlideRef::number).collect();
    let slides: Vec<(usize, SlideDescriptor)> = descriptors
        .iter()
        .enumerate()
        .filter(|(_, d)| wanted.contains(&d.number))
        .map(|(index, d)| (index + 1, d.clone()))
        .collect();

    if slides.is_empty() {
        bail!("none of the selected slides were found in the outline");
    }

    Ok(Selection {
        slides,
        total: descriptors.len(),
    })
}
