//! Dockerfile rules (FILE-DOCKER-*).

use nom::{
    bytes::complete::{tag, tag_no_case, take_till, take_while, take_while1},
    character::complete::{space0, space1},
    combinator::{opt, rest},
    multi::many0,
    sequence::{pair, preceded, terminated},
    IResult,
};
use std::collections::HashSet;

use crate::compliance::checkers::is_floating_image;
use crate::compliance::policies::{
    FILE_DOCKER_ADD, FILE_DOCKER_BASE_TAG, FILE_DOCKER_DOWNLOAD_CLEANUP, FILE_DOCKER_HEALTHCHECK,
    FILE_DOCKER_USER,
};
use crate::compliance::types::CheckResult;

/// A logical Dockerfile instruction, continuation lines already joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Upper-cased instruction keyword (`FROM`, `RUN`, ...)
    pub keyword: String,
    pub arguments: String,
    /// 1-based line the instruction starts on
    pub line: usize,
}

/// Split Dockerfile content into instructions, skipping comments and blank lines.
pub fn parse_instructions(content: &str) -> Vec<Instruction> {
    let mut instructions = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (idx, raw) in content.lines().enumerate() {
        let trimmed = raw.trim();
        if trimmed.starts_with('#') {
            continue;
        }
        if trimmed.is_empty() && pending.is_none() {
            continue;
        }

        let (continues, body) = match trimmed.strip_suffix('\\') {
            Some(body) => (true, body.trim_end()),
            None => (false, trimmed),
        };

        let (start, mut text) = pending.take().unwrap_or((idx + 1, String::new()));
        if !text.is_empty() && !body.is_empty() {
            text.push(' ');
        }
        text.push_str(body);

        if continues {
            pending = Some((start, text));
        } else if let Some(instruction) = to_instruction(start, &text) {
            instructions.push(instruction);
        }
    }

    if let Some((start, text)) = pending {
        instructions.extend(to_instruction(start, &text));
    }

    instructions
}

fn to_instruction(line: usize, text: &str) -> Option<Instruction> {
    // Lines that do not start with a keyword (template syntax, stray text) are skipped
    let (_, (keyword, arguments)) = instruction_line(text.trim()).ok()?;
    Some(Instruction {
        keyword: keyword.to_uppercase(),
        arguments: arguments.trim().to_string(),
        line,
    })
}

/// Keyword followed by its (possibly empty) arguments.
fn instruction_line(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, keyword) = take_while1(|c: char| c.is_ascii_alphabetic())(input)?;
    let (input, _) = space0(input)?;
    let (input, arguments) = rest(input)?;
    Ok((input, (keyword, arguments)))
}

/// Evaluate a Dockerfile.
pub fn check_dockerfile(content: &str, resource: &str) -> Vec<CheckResult> {
    let instructions = parse_instructions(content);
    let mut results = Vec::new();

    let mut last_user: Option<&str> = None;
    let mut has_healthcheck = false;
    let mut floating_base = false;
    let mut stages: HashSet<String> = HashSet::new();

    for instruction in &instructions {
        let args = instruction.arguments.as_str();
        match instruction.keyword.as_str() {
            "USER" => last_user = Some(args),
            "HEALTHCHECK" => {
                has_healthcheck = !args.eq_ignore_ascii_case("none");
            }
            "FROM" => {
                let (image, alias) = parse_from(args);
                if let Some(image) = image {
                    let is_stage = stages.contains(&image.to_lowercase());
                    let unresolved = image.contains('$');
                    if !is_stage && !unresolved && !image.eq_ignore_ascii_case("scratch") {
                        floating_base |= is_floating_image(image);
                    }
                }
                if let Some(alias) = alias {
                    stages.insert(alias.to_lowercase());
                }
            }
            "ADD" => {
                if !args.contains("http") && !args.contains(".tar") {
                    results.push(FILE_DOCKER_ADD.fail(
                        resource,
                        format!("Use COPY instead of ADD for local files (line {})", instruction.line),
                    ));
                }
            }
            "RUN" => {
                let downloads = args.contains("curl") || args.contains("wget");
                let cleans_up = args.contains("&&") && args.contains("rm");
                if downloads && !cleans_up {
                    results.push(FILE_DOCKER_DOWNLOAD_CLEANUP.fail(
                        resource,
                        format!(
                            "Downloaded files should be cleaned up in same layer (line {})",
                            instruction.line
                        ),
                    ));
                }
            }
            _ => {}
        }
    }

    match last_user {
        None => results.push(FILE_DOCKER_USER.fail(resource, "Dockerfile has no USER directive")),
        Some(user) if is_root_user(user) => {
            results.push(FILE_DOCKER_USER.fail(resource, "Dockerfile runs as root (USER root)"))
        }
        Some(_) => {}
    }

    if !has_healthcheck {
        results.push(FILE_DOCKER_HEALTHCHECK.fail(resource, "Dockerfile has no HEALTHCHECK"));
    }

    if floating_base {
        results.push(FILE_DOCKER_BASE_TAG.fail(resource, "Base image uses 'latest' or no tag"));
    }

    results
}

/// Image and optional stage alias of a `FROM` instruction; `--flags` are skipped.
fn parse_from(args: &str) -> (Option<&str>, Option<&str>) {
    match from_arguments(args.trim()) {
        Ok((_, (image, alias))) if !image.is_empty() => (Some(image), alias),
        _ => (None, None),
    }
}

fn from_arguments(input: &str) -> IResult<&str, (&str, Option<&str>)> {
    // --platform=..., --some-flag
    let (input, _) = many0(terminated(
        preceded(tag("--"), take_till(|c: char| c.is_whitespace())),
        space0,
    ))(input)?;

    let (input, image) = take_till(|c: char| c.is_whitespace())(input)?;
    let (input, _) = space0(input)?;

    let (input, alias) = opt(preceded(
        pair(tag_no_case("AS"), space1),
        take_while(|c: char| c.is_alphanumeric() || c == '_' || c == '-' || c == '.'),
    ))(input)?;

    Ok((input, (image, alias.filter(|a| !a.is_empty()))))
}

fn is_root_user(user: &str) -> bool {
    let user = user.split(':').next().unwrap_or_default().trim();
    user == "root" || user == "0"
}
