//! Presentation controller
//!
//! Sits between the user and the [`ContactStore`]: it owns the input draft,
//! the selected row and the displayed rows, turns [`Action`]s into store
//! calls and re-renders the table after every mutation or search.
//!
//! Errors raised while handling an action never escape [`Controller::dispatch`];
//! they are reported through [`View::notify`] and the controller stays usable.

use std::path::{Path, PathBuf};
use crate::analysis::ContactReport;
use crate::contact::{Category, Contact, ContactDraft};
use crate::storage::ContactStore;
use crate::{transfer, Result};

/// Text shown for [`Action::Help`]
pub const HELP_TEXT: &str = "\
Commands:
  add              enter name, phone and category, then save a new contact
  select <id>      select a row of the table
  update           edit the selected contact
  delete           delete the selected contact (asks first)
  search           show only contacts whose name, phone or category contain a keyword
  all              show every contact again
  export           write all contacts to a CSV file
  import           add contacts from a CSV file (ID,Name,Phone,Category)
  report           summary of the contacts in the table
  help             this text
  quit             close the database and exit";

/// A message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Warning(String),
    Error(String),
}

/// User-facing surface the controller drives.
pub trait View {
    /// Show the current table
    fn render(&mut self, contacts: &[Contact], selected: Option<i64>);

    /// Ask for a value, optionally pre-filled. `None` means cancelled.
    fn prompt(&mut self, label: &str, initial: Option<&str>) -> Option<String>;

    /// Ask a yes/no question
    fn confirm(&mut self, question: &str) -> bool;

    fn notify(&mut self, notice: Notice);

    fn show_report(&mut self, report: &ContactReport);

    /// Called once per imported row with its CSV line number
    fn import_progress(&mut self, _line: u64) {}
}

/// Something the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add,
    Update,
    Delete,
    Search,
    ShowAll,
    Select(i64),
    Export,
    Import,
    Report,
    Help,
}

pub struct Controller<V: View> {
    store: ContactStore,
    view: V,
    draft: ContactDraft,
    selected: Option<i64>,
    filter: Option<String>,
    rows: Vec<Contact>,
}

impl<V: View> Controller<V> {
    /// Take ownership of the store and render the full table
    pub fn new(store: ContactStore, view: V) -> Result<Self> {
        let mut controller = Self {
            store,
            view,
            draft: ContactDraft::default(),
            selected: None,
            filter: None,
            rows: Vec::new(),
        };
        controller.reload()?;
        Ok(controller)
    }

    pub fn rows(&self) -> &[Contact] {
        &self.rows
    }

    pub fn selected(&self) -> Option<&Contact> {
        let id = self.selected?;
        self.rows.iter().find(|c| c.id == id)
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn draft(&self) -> &ContactDraft {
        &self.draft
    }

    /// Replace the input fields
    pub fn set_draft(&mut self, draft: ContactDraft) {
        self.draft = draft;
    }

    pub fn store(&self) -> &ContactStore {
        &self.store
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Give the store back so it can be closed
    pub fn into_store(self) -> ContactStore {
        self.store
    }

    /// Fill the input fields by prompting for each one.
    ///
    /// A cancelled prompt leaves its field empty; [`Action::Add`] then
    /// rejects the draft.
    pub fn edit_draft(&mut self) {
        let name = self.view.prompt("Name", None).unwrap_or_default();
        let phone = self.view.prompt("Phone", None).unwrap_or_default();
        let suggestions: Vec<&str> = Category::all().iter().map(Category::as_str).collect();
        let category_label = format!("Category ({})", suggestions.join("/"));
        let category = self
            .view
            .prompt(&category_label, Some(Category::Other.as_str()))
            .unwrap_or_default();
        self.draft = ContactDraft::new(name, phone, category);
    }

    /// Run one action, reporting any failure to the view
    pub fn dispatch(&mut self, action: Action) {
        tracing::debug!(?action, "dispatching action");
        let result = match action.clone() {
            Action::Add => self.add(),
            Action::Update => self.update(),
            Action::Delete => self.delete(),
            Action::Search => self.search(),
            Action::ShowAll => self.show_all(),
            Action::Select(id) => {
                self.select(id);
                Ok(())
            }
            Action::Export => self.export(),
            Action::Import => self.import(),
            Action::Report => {
                self.report();
                Ok(())
            }
            Action::Help => {
                self.view.notify(Notice::Info(HELP_TEXT.to_string()));
                Ok(())
            }
        };

        if let Err(e) = result {
            tracing::error!(?action, error = %e, "action failed");
            self.view.notify(Notice::Error(e.to_string()));
        }
    }

    fn add(&mut self) -> Result<()> {
        let draft = match self.draft.validate() {
            Ok(draft) => draft,
            Err(e) => {
                tracing::warn!(error = %e, "rejected contact input");
                self.view.notify(Notice::Warning(e.to_string()));
                return Ok(());
            }
        };

        let id = self.store.create(&draft.name, &draft.phone, &draft.category)?;
        self.draft.clear();
        self.filter = None;
        self.reload()?;
        self.view.notify(Notice::Info(format!("Added {} (#{})", draft.name, id)));
        Ok(())
    }

    fn update(&mut self) -> Result<()> {
        let Some(current) = self.selected().cloned() else {
            self.view.notify(Notice::Warning("Select a contact to update first".to_string()));
            return Ok(());
        };

        let Some(name) = self.prompt_value("Name", &current.name) else {
            return Ok(());
        };
        let Some(phone) = self.prompt_value("Phone", &current.phone) else {
            return Ok(());
        };
        let Some(category) = self.prompt_value("Category", &current.category) else {
            return Ok(());
        };
        let draft = ContactDraft::new(name, phone, category).validate()?;

        let found = self.store.update(current.id, &draft.name, &draft.phone, &draft.category)?;
        self.filter = None;
        self.reload()?;

        if found {
            self.view.notify(Notice::Info(format!("Updated {} (#{})", draft.name, current.id)));
        } else {
            self.view.notify(Notice::Warning(format!(
                "Contact #{} no longer exists",
                current.id
            )));
        }
        Ok(())
    }

    fn delete(&mut self) -> Result<()> {
        let Some(current) = self.selected().cloned() else {
            self.view.notify(Notice::Warning("Select a contact to delete first".to_string()));
            return Ok(());
        };

        let question = format!("Delete contact '{}'?", current.name);
        if !self.view.confirm(&question) {
            return Ok(());
        }

        let found = self.store.delete(current.id)?;
        self.filter = None;
        self.reload()?;

        if found {
            self.view.notify(Notice::Info(format!("Deleted {}", current.name)));
        } else {
            self.view.notify(Notice::Warning(format!(
                "Contact #{} no longer exists",
                current.id
            )));
        }
        Ok(())
    }

    fn search(&mut self) -> Result<()> {
        let keyword = match self.view.prompt("Search", None) {
            Some(keyword) if !keyword.trim().is_empty() => keyword.trim().to_string(),
            _ => return Ok(()),
        };

        self.filter = Some(keyword);
        self.reload()?;
        self.view.notify(Notice::Info(format!(
            "{} match(es) for '{}'",
            self.rows.len(),
            self.filter.as_deref().unwrap_or_default()
        )));
        Ok(())
    }

    fn show_all(&mut self) -> Result<()> {
        self.filter = None;
        self.reload()
    }

    fn select(&mut self, id: i64) {
        if self.rows.iter().any(|c| c.id == id) {
            self.selected = Some(id);
            self.view.render(&self.rows, self.selected);
        } else {
            self.view.notify(Notice::Warning(format!("Contact #{} is not in the table", id)));
        }
    }

    fn export(&mut self) -> Result<()> {
        let Some(path) = self.prompt_path("Export to", Some("contacts.csv")) else {
            return Ok(());
        };
        let written = self.export_to(&path)?;
        self.view.notify(Notice::Info(format!(
            "Exported {} contact(s) to {}",
            written,
            path.display()
        )));
        Ok(())
    }

    fn import(&mut self) -> Result<()> {
        let Some(path) = self.prompt_path("Import from", None) else {
            return Ok(());
        };
        let created = self.import_from(&path)?;
        self.view.notify(Notice::Info(format!(
            "Imported {} contact(s) from {}",
            created,
            path.display()
        )));
        Ok(())
    }

    fn report(&mut self) {
        let report = ContactReport::from_contacts(&self.rows);
        self.view.show_report(&report);
    }

    /// Write every contact, regardless of the current filter, to `path`
    pub fn export_to(&self, path: &Path) -> Result<usize> {
        transfer::export_csv(&self.store, path)
    }

    /// Import `path` and show the full table afterwards.
    ///
    /// The table is reloaded even when a row fails, so rows inserted before
    /// the failure are visible.
    pub fn import_from(&mut self, path: &Path) -> Result<usize> {
        let view = &mut self.view;
        let imported = transfer::import_csv(&self.store, path, |line| view.import_progress(line));

        self.filter = None;
        self.reload()?;
        imported
    }

    /// Re-query the store and render
    fn reload(&mut self) -> Result<()> {
        self.rows = self.store.fetch(self.filter.as_deref())?;
        if let Some(id) = self.selected {
            if !self.rows.iter().any(|c| c.id == id) {
                self.selected = None;
            }
        }
        self.view.render(&self.rows, self.selected);
        Ok(())
    }

    /// Prompt seeded with `initial`; cancelled or blank answers yield `None`
    fn prompt_value(&mut self, label: &str, initial: &str) -> Option<String> {
        self.view
            .prompt(label, Some(initial))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn prompt_path(&mut self, label: &str, initial: Option<&str>) -> Option<PathBuf> {
        self.view
            .prompt(label, initial)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// View that answers prompts from a script and records what it was shown
    #[derive(Default)]
    struct ScriptedView {
        answers: VecDeque<Option<String>>,
        confirmations: VecDeque<bool>,
        prompts: Vec<(String, Option<String>)>,
        notices: Vec<Notice>,
        renders: usize,
        reports: Vec<ContactReport>,
    }

    impl ScriptedView {
        fn answering(answers: &[Option<&str>]) -> Self {
            Self {
                answers: answers.iter().map(|a| a.map(str::to_string)).collect(),
                ..Default::default()
            }
        }

        fn last_notice(&self) -> &Notice {
            self.notices.last().unwrap()
        }
    }

    impl View for ScriptedView {
        fn render(&mut self, _contacts: &[Contact], _selected: Option<i64>) {
            self.renders += 1;
        }

        fn prompt(&mut self, label: &str, initial: Option<&str>) -> Option<String> {
            self.prompts.push((label.to_string(), initial.map(str::to_string)));
            self.answers.pop_front().flatten()
        }

        fn confirm(&mut self, _question: &str) -> bool {
            self.confirmations.pop_front().unwrap_or(false)
        }

        fn notify(&mut self, notice: Notice) {
            self.notices.push(notice);
        }

        fn show_report(&mut self, report: &ContactReport) {
            self.reports.push(report.clone());
        }
    }

    fn controller_with(view: ScriptedView) -> Controller<ScriptedView> {
        let store = ContactStore::open_in_memory().unwrap();
        store.create("Ana", "555-1111", "Work").unwrap();
        store.create("Bruno", "555-2222", "Family").unwrap();
        Controller::new(store, view).unwrap()
    }

    #[test]
    fn test_new_renders_full_table() {
        let controller = controller_with(ScriptedView::default());
        assert_eq!(controller.rows().len(), 2);
        assert_eq!(controller.view().renders, 1);
    }

    #[test]
    fn test_add_creates_clears_and_reloads() {
        let mut controller = controller_with(ScriptedView::default());
        controller.set_draft(ContactDraft::new(" Carla ", "555-3333", "friends"));

        controller.dispatch(Action::Add);

        let added = controller.rows().last().unwrap();
        assert_eq!((added.name.as_str(), added.category.as_str()), ("Carla", "friends"));
        assert_eq!(controller.draft(), &ContactDraft::default());
        assert_eq!(controller.view().renders, 2);
        assert!(matches!(controller.view().last_notice(), Notice::Info(_)));
    }

    #[test]
    fn test_add_rejects_blank_fields_without_store_call() {
        let mut controller = controller_with(ScriptedView::default());

        controller.set_draft(ContactDraft::new("   ", "555-3333", "Work"));
        controller.dispatch(Action::Add);
        controller.set_draft(ContactDraft::new("Carla", "", "Work"));
        controller.dispatch(Action::Add);

        assert_eq!(controller.store().count().unwrap(), 2);
        assert_eq!(controller.view().renders, 1);
        assert_eq!(
            controller.view().notices,
            vec![
                Notice::Warning("Contact name must not be empty".to_string()),
                Notice::Warning("Contact phone must not be empty".to_string()),
            ]
        );
    }

    #[test]
    fn test_edit_draft_collects_fields() {
        let view = ScriptedView::answering(&[Some("Carla"), None, Some("Work")]);
        let mut controller = controller_with(view);

        controller.edit_draft();

        assert_eq!(controller.draft(), &ContactDraft::new("Carla", "", "Work"));
        let (label, initial) = &controller.view().prompts[2];
        assert!(label.starts_with("Category"));
        assert_eq!(initial.as_deref(), Some("Other"));
    }

    #[test]
    fn test_update_requires_selection() {
        let mut controller = controller_with(ScriptedView::default());
        controller.dispatch(Action::Update);

        assert!(controller.view().prompts.is_empty());
        assert!(matches!(controller.view().last_notice(), Notice::Warning(_)));
    }

    #[test]
    fn test_update_prompts_with_current_values() {
        let view = ScriptedView::answering(&[Some("Ana B."), Some("555-1111"), Some("Work")]);
        let mut controller = controller_with(view);
        controller.dispatch(Action::Select(1));

        controller.dispatch(Action::Update);

        let seeded: Vec<Option<&str>> = controller
            .view()
            .prompts
            .iter()
            .map(|(_, initial)| initial.as_deref())
            .collect();
        assert_eq!(seeded, vec![Some("Ana"), Some("555-1111"), Some("Work")]);
        assert_eq!(controller.store().get(1).unwrap().unwrap().name, "Ana B.");
        assert_eq!(controller.selected().unwrap().id, 1);
    }

    #[test]
    fn test_update_cancelled_prompt_changes_nothing() {
        let view = ScriptedView::answering(&[Some("Ana B."), None]);
        let mut controller = controller_with(view);
        controller.dispatch(Action::Select(1));

        controller.dispatch(Action::Update);

        assert_eq!(controller.store().get(1).unwrap().unwrap().name, "Ana");
        assert_eq!(controller.view().prompts.len(), 2);
    }

    #[test]
    fn test_update_of_vanished_row_warns() {
        let view = ScriptedView::answering(&[Some("Ana B."), Some("1"), Some("Work")]);
        let mut controller = controller_with(view);
        controller.dispatch(Action::Select(1));
        controller.store().delete(1).unwrap();

        controller.dispatch(Action::Update);

        assert_eq!(
            controller.view().last_notice(),
            &Notice::Warning("Contact #1 no longer exists".to_string())
        );
        assert_eq!(controller.rows().len(), 1);
        assert!(controller.selected().is_none());
    }

    #[test]
    fn test_delete_needs_confirmation() {
        let mut controller = controller_with(ScriptedView::default());
        controller.dispatch(Action::Select(2));

        controller.view_mut().confirmations.push_back(false);
        controller.dispatch(Action::Delete);
        assert_eq!(controller.store().count().unwrap(), 2);

        controller.view_mut().confirmations.push_back(true);
        controller.dispatch(Action::Delete);
        assert_eq!(controller.store().count().unwrap(), 1);
        assert!(controller.rows().iter().all(|c| c.id != 2));
        assert!(controller.selected().is_none());
    }

    #[test]
    fn test_delete_without_selection_warns() {
        let mut controller = controller_with(ScriptedView::default());
        controller.dispatch(Action::Delete);
        assert_eq!(controller.store().count().unwrap(), 2);
        assert!(matches!(controller.view().last_notice(), Notice::Warning(_)));
    }

    #[test]
    fn test_select_unknown_row_warns() {
        let mut controller = controller_with(ScriptedView::default());
        controller.dispatch(Action::Select(99));
        assert!(controller.selected().is_none());
        assert!(matches!(controller.view().last_notice(), Notice::Warning(_)));
    }

    #[test]
    fn test_search_filters_and_show_all_resets() {
        let view = ScriptedView::answering(&[Some(" family ")]);
        let mut controller = controller_with(view);

        controller.dispatch(Action::Search);
        assert_eq!(controller.filter(), Some("family"));
        assert_eq!(controller.rows().len(), 1);
        assert_eq!(controller.rows()[0].name, "Bruno");

        controller.dispatch(Action::ShowAll);
        assert_eq!(controller.filter(), None);
        assert_eq!(controller.rows().len(), 2);
    }

    #[test]
    fn test_empty_search_does_not_reload() {
        let view = ScriptedView::answering(&[Some("  "), None]);
        let mut controller = controller_with(view);

        controller.dispatch(Action::Search);
        controller.dispatch(Action::Search);

        assert_eq!(controller.view().renders, 1);
        assert_eq!(controller.filter(), None);
    }

    #[test]
    fn test_report_covers_displayed_rows() {
        let view = ScriptedView::answering(&[Some("work")]);
        let mut controller = controller_with(view);
        controller.dispatch(Action::Search);

        controller.dispatch(Action::Report);

        assert_eq!(controller.view().reports[0].total, 1);
    }

    #[test]
    fn test_export_and_import_through_prompts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let path_str = path.to_str().unwrap();

        let view = ScriptedView::answering(&[Some(path_str), Some(path_str)]);
        let mut controller = controller_with(view);

        controller.dispatch(Action::Export);
        assert_eq!(
            controller.view().prompts[0],
            ("Export to".to_string(), Some("contacts.csv".to_string()))
        );
        assert!(path.exists());

        controller.dispatch(Action::Import);
        assert_eq!(controller.rows().len(), 4);
        assert_eq!(
            controller.view().last_notice(),
            &Notice::Info(format!("Imported 2 contact(s) from {}", path_str))
        );
    }

    #[test]
    fn test_import_failure_is_reported_and_table_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "ID,Name,Phone\n1,Carla,555-3333\n2,Dan,\n3,Eve,555-5555\n").unwrap();

        let view = ScriptedView::answering(&[Some(path.to_str().unwrap())]);
        let mut controller = controller_with(view);
        controller.dispatch(Action::Import);

        assert_eq!(controller.rows().len(), 3);
        match controller.view().last_notice() {
            Notice::Error(message) => assert!(message.contains("line 3")),
            other => panic!("unexpected notice: {other:?}"),
        }
    }

    #[test]
    fn test_missing_import_file_is_reported() {
        let view = ScriptedView::answering(&[Some("/definitely/not/here.csv")]);
        let mut controller = controller_with(view);

        controller.dispatch(Action::Import);

        assert!(matches!(controller.view().last_notice(), Notice::Error(_)));
        assert_eq!(controller.rows().len(), 2);
    }

    #[test]
    fn test_help_is_informational() {
        let mut controller = controller_with(ScriptedView::default());
        controller.dispatch(Action::Help);
        assert_eq!(controller.view().last_notice(), &Notice::Info(HELP_TEXT.to_string()));
        assert_eq!(controller.view().renders, 1);
    }
}
