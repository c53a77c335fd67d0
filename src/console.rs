//! Line-oriented terminal front-end for the registration form
//!
//! # Usage
//!
//! ```text
//! > last 山田
//! > first 太郎
//! > gender 1
//! > age 30
//! > pref 13
//! > intro よろしくお願いします
//! > submit
//! 登録しますか? [y/n] y
//! 登録が完了しました
//! ```

use colored::Colorize;
use std::io::{self, BufRead, Write};
use tracing::debug;

use crate::common::ValidationResult;
use crate::registration::prefectures::{self, PREFECTURES};
use crate::registration::{Field, FieldEdit, FlowError, Gender, RegistrationForm, SubmittedSnapshot};
use crate::services::SubmissionSink;

const HELP: &str = "\
コマンド:
  last <姓>          姓を入力
  first <名>         名を入力
  gender <1|2|3>     性別 (1: 男性, 2: 女性, 3: その他)
  age <数値>         年齢を入力
  pref <番号|名前>   出身 (prefs で一覧表示)
  intro <文章>       自己PRを入力
  show               入力内容を表示
  prefs              都道府県の一覧
  clear              入力内容をクリア
  submit             登録
  help               このヘルプ
  quit               終了";

/// One parsed line of console input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Edit(FieldEdit),
    Show,
    Prefectures,
    Clear,
    Submit,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };

        let command = match name {
            "last" => Command::Edit(FieldEdit::LastName(arg.to_string())),
            "first" => Command::Edit(FieldEdit::FirstName(arg.to_string())),
            "gender" => Command::Edit(FieldEdit::Gender(Gender::parse(arg))),
            // a non-numeric entry leaves the age unset
            "age" => Command::Edit(FieldEdit::Age(arg.parse::<i64>().ok())),
            "pref" => Command::Edit(FieldEdit::Prefecture(parse_prefecture(arg))),
            "intro" => Command::Edit(FieldEdit::SelfIntro(arg.to_string())),
            "show" => Command::Show,
            "prefs" => Command::Prefectures,
            "clear" => Command::Clear,
            "submit" => Command::Submit,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "" => return Err("コマンドを入力してください (help で一覧)".to_string()),
            other => return Err(format!("不明なコマンドです: {} (help で一覧)", other)),
        };
        Ok(command)
    }

    /// Short name for logging; never includes the entered value
    pub fn name(&self) -> &'static str {
        match self {
            Command::Edit(edit) => edit.field().key(),
            Command::Show => "show",
            Command::Prefectures => "prefs",
            Command::Clear => "clear",
            Command::Submit => "submit",
            Command::Help => "help",
            Command::Quit => "quit",
        }
    }
}

/// Maps a 1-based code to its prefecture; anything else is kept verbatim
fn parse_prefecture(arg: &str) -> String {
    arg.parse::<usize>()
        .ok()
        .and_then(prefectures::by_code)
        .map(String::from)
        .unwrap_or_else(|| arg.to_string())
}

pub struct FormConsole<R, W> {
    input: R,
    output: W,
    form: RegistrationForm,
}

impl<R: BufRead, W: Write> FormConsole<R, W> {
    pub fn new(input: R, output: W, form: RegistrationForm) -> Self {
        Self { input, output, form }
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn into_parts(self) -> (R, W, RegistrationForm) {
        (self.input, self.output, self.form)
    }

    /// Processes commands until `quit` or end of input
    pub async fn run<S>(&mut self, sink: &S) -> io::Result<()>
    where
        S: SubmissionSink + ?Sized,
    {
        writeln!(self.output, "{}", "ユーザー登録".bold())?;
        writeln!(self.output, "{}", HELP)?;

        while let Some(line) = self.prompt("> ")? {
            match Command::parse(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => self.handle(command, sink).await?,
                Err(message) => writeln!(self.output, "{}", message.red())?,
            }
        }

        self.output.flush()
    }

    async fn handle<S>(&mut self, command: Command, sink: &S) -> io::Result<()>
    where
        S: SubmissionSink + ?Sized,
    {
        debug!(command = command.name(), "Console command");
        match command {
            Command::Edit(edit) => {
                let field = edit.field();
                match self.form.apply(edit) {
                    Ok(errors) => {
                        let errors = errors.clone();
                        self.render_field_error(field, &errors)?;
                    }
                    Err(e) => writeln!(self.output, "{}", e.to_string().red())?,
                }
            }
            Command::Show => self.render_form()?,
            Command::Prefectures => self.render_prefectures()?,
            Command::Clear => match self.form.reset() {
                Ok(()) => writeln!(self.output, "入力内容をクリアしました")?,
                Err(e) => writeln!(self.output, "{}", e.to_string().red())?,
            },
            Command::Submit => self.submit(sink).await?,
            Command::Help => writeln!(self.output, "{}", HELP)?,
            Command::Quit => {}
        }
        Ok(())
    }

    async fn submit<S>(&mut self, sink: &S) -> io::Result<()>
    where
        S: SubmissionSink + ?Sized,
    {
        let snapshot = match self.form.submit() {
            Ok(snapshot) => snapshot,
            Err(FlowError::Invalid(errors)) => {
                writeln!(self.output, "{}", "入力内容に誤りがあります".red())?;
                return self.render_errors(&errors);
            }
            Err(e) => return writeln!(self.output, "{}", e.to_string().red()),
        };

        self.render_confirmation(&snapshot)?;

        loop {
            let Some(answer) = self.prompt("登録しますか? [y/n] ")? else {
                // input closed while the dialog was open
                self.cancel_confirmation();
                return Ok(());
            };

            match answer.trim() {
                "y" | "Y" | "yes" => {
                    writeln!(self.output, "送信中...")?;
                    self.output.flush()?;
                    return match self.form.confirm(sink).await {
                        Ok(outcome) if outcome.is_success() => {
                            writeln!(self.output, "{}", outcome.message().green())
                        }
                        Ok(outcome) => writeln!(self.output, "{}", outcome.message().red()),
                        Err(e) => writeln!(self.output, "{}", e.to_string().red()),
                    };
                }
                "n" | "N" | "no" => {
                    self.cancel_confirmation();
                    return writeln!(self.output, "登録を取り消しました");
                }
                _ => writeln!(self.output, "y または n で答えてください")?,
            }
        }
    }

    fn cancel_confirmation(&mut self) {
        if let Err(e) = self.form.cancel() {
            debug!(error = %e, "Nothing to cancel");
        }
    }

    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn render_field_error(&mut self, field: Field, errors: &ValidationResult) -> io::Result<()> {
        if let Some(message) = errors.message(field.key()) {
            writeln!(self.output, "  {}", message.red())?;
        }
        Ok(())
    }

    fn render_errors(&mut self, errors: &ValidationResult) -> io::Result<()> {
        for field in Field::ALL {
            if let Some(message) = errors.message(field.key()) {
                writeln!(self.output, "  {}: {}", field.label(), message.red())?;
            }
        }
        Ok(())
    }

    fn render_form(&mut self) -> io::Result<()> {
        let values = self.form.values().clone();
        let errors = self.form.visible_errors();

        let gender = values.gender.map(|g| g.label()).unwrap_or("");
        let age = values.age.map(|a| a.to_string()).unwrap_or_default();
        let rows = [
            (Field::Name, format!("{} {}", values.last_name, values.first_name)),
            (Field::Gender, gender.to_string()),
            (Field::Age, age),
            (Field::Prefecture, values.prefecture.clone()),
            (Field::SelfIntro, values.self_intro.clone()),
        ];

        for (field, value) in rows {
            writeln!(self.output, "{}: {}", field.label(), value.trim())?;
            self.render_field_error(field, &errors)?;
        }
        Ok(())
    }

    fn render_prefectures(&mut self) -> io::Result<()> {
        for (index, name) in PREFECTURES.iter().enumerate() {
            writeln!(self.output, "{:>2}: {}", index + 1, name)?;
        }
        Ok(())
    }

    fn render_confirmation(&mut self, snapshot: &SubmittedSnapshot) -> io::Result<()> {
        writeln!(self.output, "{}", "--- 登録内容の確認 ---".bold())?;
        writeln!(self.output, "{}: {}", Field::Name.label(), snapshot.full_name())?;
        writeln!(self.output, "{}: {}", Field::Gender.label(), snapshot.gender())?;
        writeln!(self.output, "{}: {}", Field::Age.label(), snapshot.age())?;
        writeln!(self.output, "{}: {}", Field::Prefecture.label(), snapshot.prefecture())?;
        writeln!(self.output, "{}: {}", Field::SelfIntro.label(), snapshot.self_intro())?;
        Ok(())
    }
}
