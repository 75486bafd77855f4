use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Context as _;

/// Output path argument value that selects stdout.
pub(crate) const STDOUT_PATH: &str = "-";

/// Destination of a saved artifact: stdout or a buffered file.
pub(crate) struct Output {
    writer: Box<dyn Write>,
    label: String,
}

impl Output {
    /// Opens `path` for writing, or stdout if `path` is `-`.
    pub(crate) fn create(path: &Path) -> anyhow::Result<Self> {
        if path == Path::new(STDOUT_PATH) {
            return Ok(Self {
                writer: Box::new(io::stdout().lock()),
                label: "stdout".to_owned(),
            });
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Self {
            writer: Box::new(BufWriter::new(file)),
            label: path.display().to_string(),
        })
    }

    pub(crate) fn label(&self) -> &str {
        &self.label
    }

    /// Writes `content` followed by a newline and flushes.
    pub(crate) fn save<C>(&mut self, content: &C) -> anyhow::Result<()>
    where
        C: Content + ?Sized,
    {
        let text = content.render()?;
        writeln!(self.writer, "{text}")
            .and_then(|()| self.writer.flush())
            .with_context(|| format!("Failed to write {}", self.label))
    }
}

/// Something [`Output::save`] can turn into text.
pub(crate) trait Content {
    fn render(&self) -> anyhow::Result<String>;
}

impl Content for str {
    fn render(&self) -> anyhow::Result<String> {
        Ok(self.to_owned())
    }
}

/// Pretty-printed JSON of a serializable value.
pub(crate) struct Json<'a, T>(pub(crate) &'a T);

impl<T> Content for Json<'_, T>
where
    T: serde::Serialize,
{
    fn render(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self.0).context("Failed to serialize JSON")
    }
}

pub(crate) fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {file_kind} file: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::{env, process};

    use super::*;

    #[test]
    fn test_save_json_then_read() {
        let path = env::temp_dir().join(format!("numeric-util-{}.json", process::id()));
        let value = vec![1.5, -2.0, -94.557_683_349_419_05];

        let mut output = Output::create(&path).unwrap();
        output.save(&Json(&value)).unwrap();
        drop(output);

        let restored: Vec<f64> = read_json_file("test", &path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(restored, value);
    }

    #[test]
    fn test_save_text_appends_newline() {
        let path = env::temp_dir().join(format!("numeric-util-{}.txt", process::id()));
        let mut output = Output::create(&path).unwrap();
        assert_eq!(output.label(), path.display().to_string());
        output.save("({first} + 16)").unwrap();
        drop(output);

        let text = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(text, "({first} + 16)\n");
    }

    #[test]
    fn test_read_missing_file_reports_path() {
        let path = env::temp_dir().join("numeric-util-does-not-exist.json");
        let err = read_json_file::<Vec<f64>, _>("test", &path).unwrap_err();
        assert!(format!("{err:#}").contains("numeric-util-does-not-exist.json"));
    }
}
