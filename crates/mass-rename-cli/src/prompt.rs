use std::io::{self, BufRead, Write};

pub const QUESTION: &str = "Do you wish to rename these files? [Y/n] ";

/// Asks the confirmation question and reads one line of answer.
/// An empty answer means yes. Input that ends before a full line was typed is
/// an `UnexpectedEof` error, not an answer.
pub fn confirm<R, W>(input: &mut R, output: &mut W) -> io::Result<bool>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    write!(output, "{}", QUESTION)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    if !line.ends_with('\n') {
        writeln!(output)?;
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input ended before an answer was given",
        ));
    }
    Ok(is_yes(&line))
}

pub fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "" | "y" | "yes"
    )
}
