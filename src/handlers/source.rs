use once_cell::sync::Lazy;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::{SyntaxReference, SyntaxSet};
use tracing::debug;

use super::text::TEXT_EXTENSIONS;
use super::{read_text, FileInfo, Handler, Viewer};
use crate::artifact::{Artifact, StyledSpan, TextKind, TextSurface};
use crate::error::Result;
use crate::geometry::NaturalSize;
use crate::platform::{system_theme, Theme};

const SOURCE_SIZE: NaturalSize = NaturalSize::new(900.0, 650.0);

// Only the top of a long file is ever on screen
const HIGHLIGHT_LINES: usize = 2000;

static SYNTAXES: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
static THEMES: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

// Extensions the bundled grammars lack: (extension, language, grammar extension)
const ALIASES: &[(&str, &str, &str)] = &[
    ("ts", "TypeScript", "js"),
    ("tsx", "TypeScript", "js"),
    ("mjs", "JavaScript", "js"),
    ("cjs", "JavaScript", "js"),
    ("kt", "Kotlin", "java"),
    ("kts", "Kotlin", "java"),
    ("csx", "C#", "cs"),
    ("xaml", "XAML", "xml"),
    ("csproj", "MSBuild", "xml"),
];

// Left to the text, svg and html handlers even though a grammar exists
const DEFERRED: &[&str] = &["svg", "svgz", "html", "htm", "xhtml", "shtml"];

pub struct SourceCodeHandler {
    limit: u64,
}

impl SourceCodeHandler {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

fn language_for(extension: &str) -> Option<(&'static str, &'static SyntaxReference)> {
    if extension.is_empty() || DEFERRED.contains(&extension) || TEXT_EXTENSIONS.contains(&extension) {
        return None;
    }

    let syntaxes: &'static SyntaxSet = &SYNTAXES;
    if let Some((_, language, grammar)) = ALIASES.iter().find(|(ext, _, _)| *ext == extension) {
        return syntaxes.find_syntax_by_extension(grammar).map(|syntax| (*language, syntax));
    }

    syntaxes
        .find_syntax_by_extension(extension)
        .filter(|syntax| syntax.name != "Plain Text")
        .map(|syntax| (syntax.name.as_str(), syntax))
}

fn theme_name(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "InspiredGitHub",
        Theme::Dark => "base16-ocean.dark",
    }
}

fn highlight(lines: &[String], syntax: &SyntaxReference, theme: Theme) -> Vec<Vec<StyledSpan>> {
    let Some(theme) = THEMES.themes.get(theme_name(theme)) else {
        return Vec::new();
    };
    let mut highlighter = HighlightLines::new(syntax, theme);

    let mut styled = Vec::with_capacity(lines.len().min(HIGHLIGHT_LINES));
    for line in lines.iter().take(HIGHLIGHT_LINES) {
        // The newline grammars expect each line to carry its terminator
        let line = format!("{line}\n");
        let ranges = match highlighter.highlight_line(&line, &SYNTAXES) {
            Ok(ranges) => ranges,
            Err(err) => {
                debug!("highlighting stopped: {err}");
                break;
            }
        };

        let spans = ranges
            .into_iter()
            .map(|(style, text)| StyledSpan {
                text: text.trim_end_matches('\n').to_string(),
                color: (u32::from(style.foreground.r) << 16)
                    | (u32::from(style.foreground.g) << 8)
                    | u32::from(style.foreground.b),
            })
            .filter(|span| !span.text.is_empty())
            .collect();
        styled.push(spans);
    }
    styled
}

impl Handler for SourceCodeHandler {
    fn name(&self) -> &'static str {
        "source"
    }

    fn can_open(&self, file: &FileInfo) -> bool {
        language_for(&file.extension).is_some()
    }

    fn get_viewer(&self, file: &FileInfo) -> Result<Viewer> {
        let (content, truncated) = read_text(&file.path, self.limit)?;
        let Some((language, syntax)) = language_for(&file.extension) else {
            let surface = TextSurface::from_content(TextKind::Plain, &content, truncated);
            return Ok(Viewer::new(Artifact::Text(surface), SOURCE_SIZE));
        };

        let surface = TextSurface::from_content(TextKind::Source { language }, &content, truncated);
        let highlights = highlight(&surface.lines, syntax, system_theme());
        Ok(Viewer::new(Artifact::Text(surface.with_highlights(highlights)), SOURCE_SIZE).with_metadata(language))
    }
}
