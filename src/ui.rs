// UI layer: the two-level text menu. The root menu lists the libraries, the
// Pandas menu lists fixed topics; choosing a topic builds the prompt, asks the
// assistant and renders the streamed reply. Everything is synchronous.

use crate::api::Assistant;
use crate::input::LineInput;
use crate::prompt::build_prompt;
use crate::render::render;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::Duration;

const LINE_WIDTH: usize = 40;

pub const AUTHORS: &str = "Elaborado por: Monica & Francisco";
pub const ROOT_TITLE: &str = "Asistente de IA para Python";
pub const PANDAS_TITLE: &str = "Librerías de Python - Pandas";
pub const CHOICE_PROMPT: &str = "Selecciona una opción";
pub const PAUSE_PROMPT: &str = "Pulsa Enter para continuar...";
pub const INVALID_OPTION: &str = "Opción inválida. Por favor, intenta de nuevo.";
pub const UNDER_CONSTRUCTION: &str = "🛠️ Funcionalidad en construcción. Por favor, selecciona Pandas.";
pub const FAREWELL: &str = "👋 ¡Gracias por usar el asistente! Hasta luego.";

/// Menu key that exits the root menu or goes back from a submenu.
pub const BACK_KEY: &str = "9";

/// A fixed question the Pandas menu can ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topic {
    pub key: &'static str,
    pub label: &'static str,
    pub library: &'static str,
    pub topic: &'static str,
}

pub const PANDAS_TOPICS: [Topic; 4] = [
    Topic {
        key: "1",
        label: "¿Qué es Pandas?",
        library: "Pandas",
        topic: "Definición de Pandas",
    },
    Topic {
        key: "2",
        label: "¿Qué es un DataFrame?",
        library: "Pandas",
        topic: "Qué es un DataFrame",
    },
    Topic {
        key: "3",
        label: "¿Qué es una Series?",
        library: "Pandas",
        topic: "Qué es una Series",
    },
    Topic {
        key: "4",
        label: "Crear y visualizar un DataFrame",
        library: "Pandas",
        topic: "Crear y visualizar DataFrame",
    },
];

/// Libraries listed in the root menu that have no submenu yet.
pub const PENDING_LIBRARIES: [(&str, &str); 3] =
    [("2", "NumPy"), ("3", "Matplotlib"), ("4", "Scikit-learn")];

/// Which menu is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Root,
    Pandas,
}

/// What happens after handling one choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Goto(Screen),
    /// Wait for Enter, then show the same menu again.
    Pause,
    Exit,
}

/// Look up a Pandas topic by its menu key.
pub fn pandas_topic(key: &str) -> Option<&'static Topic> {
    PANDAS_TOPICS.iter().find(|t| t.key == key)
}

/// Drives the menus until the operator exits or input runs out.
pub struct Navigator<A, I, W> {
    assistant: A,
    input: I,
    out: W,
}

impl<A, I, W> Navigator<A, I, W>
where
    A: Assistant,
    I: LineInput,
    W: Write,
{
    pub fn new(assistant: A, input: I, out: W) -> Self {
        Navigator {
            assistant,
            input,
            out,
        }
    }

    /// Main loop. Starts at the root menu and returns when the operator
    /// picks "Salir" or stdin is closed.
    pub fn run(&mut self) -> Result<()> {
        let mut screen = Screen::Root;
        loop {
            self.show_menu(screen)?;
            let Some(choice) = self.input.read_line(CHOICE_PROMPT)? else {
                return Ok(());
            };
            match self.handle(screen, choice.trim())? {
                Step::Goto(next) => screen = next,
                Step::Pause => {
                    if self.input.read_line(PAUSE_PROMPT)?.is_none() {
                        return Ok(());
                    }
                }
                Step::Exit => return Ok(()),
            }
        }
    }

    fn handle(&mut self, screen: Screen, choice: &str) -> Result<Step> {
        match screen {
            Screen::Root => self.handle_root(choice),
            Screen::Pandas => self.handle_pandas(choice),
        }
    }

    fn handle_root(&mut self, choice: &str) -> Result<Step> {
        if choice == "1" {
            return Ok(Step::Goto(Screen::Pandas));
        }
        if choice == BACK_KEY {
            writeln!(self.out, "\n{}", FAREWELL)?;
            return Ok(Step::Exit);
        }
        if PENDING_LIBRARIES.iter().any(|(key, _)| *key == choice) {
            writeln!(self.out, "{}", UNDER_CONSTRUCTION)?;
        } else {
            writeln!(self.out, "{}", INVALID_OPTION)?;
        }
        Ok(Step::Pause)
    }

    fn handle_pandas(&mut self, choice: &str) -> Result<Step> {
        if choice == BACK_KEY {
            return Ok(Step::Goto(Screen::Root));
        }
        match pandas_topic(choice) {
            Some(topic) => self.ask(topic)?,
            None => writeln!(self.out, "{}", INVALID_OPTION)?,
        }
        Ok(Step::Pause)
    }

    /// Build the prompt for `topic`, send it and print the reply as it
    /// streams in.
    fn ask(&mut self, topic: &Topic) -> Result<()> {
        log::info!("Asking about {} / {}", topic.library, topic.topic);
        let prompt = build_prompt(topic.library, topic.topic);

        // Error messages are held back until the spinner is gone.
        let mut notices = Vec::new();
        let spinner = waiting_spinner();
        let asked = self.assistant.ask(&prompt, &mut notices);
        spinner.finish_and_clear();

        let lines = asked.context("Failed to send question")?;
        self.out.write_all(&notices)?;
        render(lines, &mut self.out).context("Failed to print reply")?;
        Ok(())
    }

    fn show_menu(&mut self, screen: Screen) -> Result<()> {
        let rule = "-".repeat(LINE_WIDTH);
        let title = match screen {
            Screen::Root => ROOT_TITLE,
            Screen::Pandas => PANDAS_TITLE,
        };
        if screen == Screen::Root {
            writeln!(self.out, "{}", AUTHORS)?;
        }
        writeln!(self.out, "{}", rule)?;
        writeln!(self.out, "{:^width$}", title, width = LINE_WIDTH)?;
        writeln!(self.out, "{}", rule)?;
        match screen {
            Screen::Root => {
                writeln!(self.out, "1. Pandas")?;
                for (key, name) in PENDING_LIBRARIES {
                    writeln!(self.out, "{}. {}", key, name)?;
                }
                writeln!(self.out, "{}. Salir", BACK_KEY)?;
            }
            Screen::Pandas => {
                for topic in &PANDAS_TOPICS {
                    writeln!(self.out, "{}. {}", topic.key, topic.label)?;
                }
                writeln!(self.out, "{}. Regresar al menú principal", BACK_KEY)?;
            }
        }
        writeln!(self.out, "{}", rule)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Spinner on stderr while waiting for the server to answer. Hidden when
/// stderr is not a terminal.
fn waiting_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Consultando al asistente...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ReaderInput;
    use crate::render::REPLY_LABEL;
    use std::cell::RefCell;
    use std::io::{self, Cursor};

    /// Records every prompt and replays canned reply lines.
    struct RecordingAssistant {
        prompts: RefCell<Vec<String>>,
        reply: Vec<String>,
        failure: Option<&'static str>,
    }

    impl RecordingAssistant {
        fn replying(lines: &[&str]) -> Self {
            RecordingAssistant {
                prompts: RefCell::new(Vec::new()),
                reply: lines.iter().map(|l| l.to_string()).collect(),
                failure: None,
            }
        }

        fn failing(message: &'static str) -> Self {
            RecordingAssistant {
                failure: Some(message),
                ..Self::replying(&[])
            }
        }
    }

    impl Assistant for RecordingAssistant {
        type Lines = std::vec::IntoIter<String>;

        fn ask(&self, prompt: &str, out: &mut dyn Write) -> io::Result<Self::Lines> {
            self.prompts.borrow_mut().push(prompt.to_string());
            if let Some(message) = self.failure {
                writeln!(out, "{}", message)?;
                return Ok(Vec::new().into_iter());
            }
            Ok(self.reply.clone().into_iter())
        }
    }

    type TestNavigator = Navigator<RecordingAssistant, ReaderInput<Cursor<String>, io::Sink>, Vec<u8>>;

    fn run_script(assistant: RecordingAssistant, script: &str) -> TestNavigator {
        let input = ReaderInput::new(Cursor::new(script.to_string()), io::sink());
        let mut nav = Navigator::new(assistant, input, Vec::new());
        nav.run().unwrap();
        nav
    }

    fn output_of(nav: &TestNavigator) -> String {
        String::from_utf8(nav.out.clone()).unwrap()
    }

    fn prompts_of(nav: &TestNavigator) -> Vec<String> {
        nav.assistant.prompts.borrow().clone()
    }

    #[test]
    fn exit_from_root_says_goodbye() {
        let nav = run_script(RecordingAssistant::replying(&[]), "9\n");
        let out = output_of(&nav);
        assert!(out.contains(FAREWELL));
        assert_eq!(out.matches(ROOT_TITLE).count(), 1);
        assert!(out.starts_with(&format!("{}\n{}", AUTHORS, "-".repeat(LINE_WIDTH))));
        assert!(prompts_of(&nav).is_empty());
    }

    #[test]
    fn invalid_root_option_stays_on_root() {
        let nav = run_script(RecordingAssistant::replying(&[]), "x\n\n9\n");
        let out = output_of(&nav);
        assert_eq!(out.matches(INVALID_OPTION).count(), 1);
        assert_eq!(out.matches(ROOT_TITLE).count(), 2);
        assert!(!out.contains(PANDAS_TITLE));
    }

    #[test]
    fn invalid_pandas_option_stays_on_pandas() {
        let nav = run_script(RecordingAssistant::replying(&[]), "1\n7\n\n9\n9\n");
        let out = output_of(&nav);
        assert_eq!(out.matches(INVALID_OPTION).count(), 1);
        assert_eq!(out.matches(PANDAS_TITLE).count(), 2);
        // Credits only head the root menu.
        assert_eq!(out.matches(AUTHORS).count(), 2);
        assert!(prompts_of(&nav).is_empty());
    }

    #[test]
    fn pending_libraries_are_not_implemented() {
        let nav = run_script(RecordingAssistant::replying(&[]), "2\n\n3\n\n4\n\n9\n");
        let out = output_of(&nav);
        assert_eq!(out.matches(UNDER_CONSTRUCTION).count(), 3);
        assert_eq!(out.matches(ROOT_TITLE).count(), 4);
        assert!(prompts_of(&nav).is_empty());
    }

    #[test]
    fn pandas_options_ask_the_fixed_topics() {
        let expected = [
            ("1", "Definición de Pandas"),
            ("2", "Qué es un DataFrame"),
            ("3", "Qué es una Series"),
            ("4", "Crear y visualizar DataFrame"),
        ];
        for (key, topic) in expected {
            let script = format!("1\n{}\n\n9\n9\n", key);
            let nav = run_script(RecordingAssistant::replying(&[]), &script);
            assert_eq!(prompts_of(&nav), vec![build_prompt("Pandas", topic)]);
        }
    }

    #[test]
    fn reply_is_rendered_after_asking() {
        let assistant = RecordingAssistant::replying(&[
            r#"{"message":{"content":"Hola"}}"#,
            "not json",
            r#"{"message":{"content":" mundo"}}"#,
        ]);
        let nav = run_script(assistant, "1\n1\n\n9\n9\n");
        assert!(output_of(&nav).contains(&format!("{}Hola mundo\n", REPLY_LABEL)));
    }

    #[test]
    fn failed_request_prints_notice_then_empty_reply() {
        let nav = run_script(
            RecordingAssistant::failing("❌ Error 404: not found"),
            "1\n2\n\n9\n9\n",
        );
        let out = output_of(&nav);
        assert!(out.contains(&format!("❌ Error 404: not found\n{}\n", REPLY_LABEL)));
    }

    #[test]
    fn repeated_option_sends_independent_identical_prompts() {
        let nav = run_script(RecordingAssistant::replying(&[]), "1\n2\n\n2\n\n9\n9\n");
        let prompts = prompts_of(&nav);
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[0], prompts[1]);
    }

    #[test]
    fn choices_are_trimmed() {
        let nav = run_script(RecordingAssistant::replying(&[]), " 1 \n 3\n\n9\n 9 \n");
        assert_eq!(
            prompts_of(&nav),
            vec![build_prompt("Pandas", "Qué es una Series")]
        );
    }

    #[test]
    fn closed_input_ends_the_session() {
        let nav = run_script(RecordingAssistant::replying(&[]), "1\n");
        let out = output_of(&nav);
        assert!(out.contains(PANDAS_TITLE));
        assert!(!out.contains(FAREWELL));
    }

    #[test]
    fn topic_lookup_matches_menu_keys() {
        assert_eq!(pandas_topic("2").map(|t| t.topic), Some("Qué es un DataFrame"));
        assert_eq!(pandas_topic("9"), None);
        assert_eq!(pandas_topic(""), None);
    }
}
