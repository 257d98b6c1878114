use std::str::FromStr;

/// Prompts until the answer parses as `T`.
pub fn prompt_parsed<T>(prompt: &str) -> eyre::Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    loop {
        let answer = inquire::Text::new(prompt).prompt()?;

        match answer.trim().parse() {
            Ok(value) => return Ok(value),
            Err(e) => println!("Error: {}", e),
        }
    }
}

/// Like [`prompt_parsed`] but Esc yields `None`.
pub fn prompt_parsed_skippable<T>(prompt: &str) -> eyre::Result<Option<T>>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    loop {
        let Some(answer) = inquire::Text::new(prompt).prompt_skippable()? else {
            return Ok(None);
        };

        match answer.trim().parse() {
            Ok(value) => return Ok(Some(value)),
            Err(e) => println!("Error: {}", e),
        }
    }
}
