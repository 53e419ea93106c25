//! Trivia questions, served straight from a JSON file.
//!
//! The file holds a JSON array, each element is one question. The shape of a
//! question is up to whoever writes the file, it's handed to the client untouched.

use std::fs;
use std::path::{Path, PathBuf};

use derive_more::{Display, From};
use rand::Rng;
use serde_json::Value;

use crate::errors::ServiceError;

pub mod routes;

#[derive(Debug, Display, From)]
pub enum QuestionError {
    #[display(fmt = "unable to read the questions: {}", _0)]
    Io(std::io::Error),

    #[display(fmt = "the questions are not a valid json array: {}", _0)]
    Parse(serde_json::Error),

    #[display(fmt = "there are no questions")]
    #[from(ignore)]
    Empty,
}

impl From<QuestionError> for ServiceError {
    fn from(error: QuestionError) -> ServiceError {
        error!("unable to pick a question: {}", error);
        ServiceError::InternalServerError("No se pudo obtener la pregunta".to_string())
    }
}

/// Location of the questions file.
///
/// The file is read again for every question,
/// so it can be edited without restarting the server.
#[derive(Debug, Clone)]
pub struct QuestionFile {
    path: PathBuf,
}

impl QuestionFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> QuestionFile {
        QuestionFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<Value>, QuestionError> {
        let data = fs::read_to_string(&self.path)?;
        let questions: Vec<Value> = serde_json::from_str(&data)?;

        Ok(questions)
    }

    /// Picks a question uniformly at random, the same question can come up twice in a row
    pub fn random(&self) -> Result<Value, QuestionError> {
        let mut questions = self.load()?;

        if questions.is_empty() {
            return Err(QuestionError::Empty);
        }

        let index = rand::thread_rng().gen_range(0, questions.len());

        Ok(questions.swap_remove(index))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    /// Writes `contents` to a fresh file in the temp dir
    pub fn question_file(name: &str, contents: &str) -> QuestionFile {
        let path = std::env::temp_dir().join(format!(
            "gamification-{}-{}.json",
            name,
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();

        QuestionFile::new(path)
    }

    #[test]
    fn picks_one_of_the_questions() {
        let questions = json!([
            { "pregunta": "¿Capital de Francia?", "respuesta": "París" },
            { "pregunta": "¿Cuántos lados tiene un hexágono?", "respuesta": 6 },
            { "pregunta": "¿Planeta más grande?", "respuesta": "Júpiter" },
        ]);
        let file = question_file("picks", &questions.to_string());

        for _ in 0..20 {
            let question = file.random().unwrap();
            assert!(questions.as_array().unwrap().contains(&question));
        }
    }

    #[test]
    fn missing_file() {
        let file = QuestionFile::new("/definitely/not/here/preguntas.json");

        assert!(matches!(file.random(), Err(QuestionError::Io(_))));
    }

    #[test]
    fn malformed_file() {
        let file = question_file("malformed", "[{ \"pregunta\": ");
        assert!(matches!(file.random(), Err(QuestionError::Parse(_))));

        let file = question_file("not-an-array", "{ \"pregunta\": \"?\" }");
        assert!(matches!(file.random(), Err(QuestionError::Parse(_))));
    }

    #[test]
    fn empty_file() {
        let file = question_file("empty", "[]");

        assert!(matches!(file.random(), Err(QuestionError::Empty)));
    }

    #[test]
    fn every_failure_reads_the_same_to_clients() {
        let expected =
            ServiceError::InternalServerError("No se pudo obtener la pregunta".to_string());

        assert_eq!(ServiceError::from(QuestionError::Empty), expected);

        let missing = QuestionFile::new("/definitely/not/here/preguntas.json");
        assert_eq!(missing.random().map_err(ServiceError::from), Err(expected));
    }
}
