use pawpal_core::AppError;
use pawpal_core::config::Config;

/// Splits an interactive line into arguments. Double quotes group words and
/// `\"` or `\\` inside quotes are taken literally.
pub fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        match ch {
            '\\' if in_quotes => escape = true,
            '"' => in_quotes = !in_quotes,
            ch if ch.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            ch => current.push(ch),
        }
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

/// Replaces a leading alias with its configured command line. Expansion is
/// not repeated on the result.
pub fn expand_alias(args: Vec<String>, config: &Config) -> Result<Vec<String>, AppError> {
    let Some(expansion) = args.first().and_then(|first| config.aliases.get(first)) else {
        return Ok(args);
    };

    let mut expanded = split_command_line(expansion)?;
    expanded.extend(args.into_iter().skip(1));
    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use super::{expand_alias, split_command_line};
    use pawpal_core::config::Config;

    #[test]
    fn split_keeps_quoted_words_together() {
        let args = split_command_line(r#"task add Mochi "Morning walk" "2026-02-15 08:00""#).unwrap();
        assert_eq!(
            args,
            vec!["task", "add", "Mochi", "Morning walk", "2026-02-15 08:00"]
        );
    }

    #[test]
    fn split_handles_escapes_inside_quotes() {
        let args = split_command_line(r#"owner "Jo \"JJ\" Lee" "C:\path""#).unwrap();
        assert_eq!(args, vec!["owner", r#"Jo "JJ" Lee"#, r"C:\path"]);
    }

    #[test]
    fn split_rejects_unterminated_quote() {
        let err = split_command_line(r#"owner "Jordan"#).unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn expand_alias_rewrites_first_word_only() {
        let config = Config {
            aliases: [("up".to_string(), "list upcoming".to_string())]
                .into_iter()
                .collect(),
            ..Config::default()
        };

        let expanded = expand_alias(
            vec!["up".into(), "--days".into(), "2".into()],
            &config,
        )
        .unwrap();
        assert_eq!(expanded, vec!["list", "upcoming", "--days", "2"]);

        let untouched = expand_alias(vec!["conflicts".into(), "up".into()], &config).unwrap();
        assert_eq!(untouched, vec!["conflicts", "up"]);
    }
}
