//! Staged component scaffolding: design, implement, review, document, save.
//!
//! Drives the dev team through one stage per specialist, scraping code out
//! of the implementation and documentation responses and writing the
//! results to disk.

use std::path::{Path, PathBuf};

use anyhow::Result;
use colored::Colorize;
use serde_json::json;

use crate::agents::DevTeam;
use crate::extract::{CodeExtractor, ExtractedFiles};
use crate::llm::ChatClient;

pub struct ComponentBuilder {
    team: DevTeam,
    extractor: CodeExtractor,
    files: ExtractedFiles,
    name: String,
    description: String,
}

impl ComponentBuilder {
    /// `name` is the component stem (used for default file names),
    /// `description` is what the component should do.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            team: DevTeam::new(),
            extractor: CodeExtractor::new(name.clone()),
            files: ExtractedFiles::new(),
            name,
            description: description.into(),
        }
    }

    /// Runs the full pipeline and writes the extracted files under `dir`.
    pub async fn run(&mut self, client: &ChatClient, dir: &Path) -> Result<Vec<PathBuf>> {
        self.initialize();
        println!("{}", "Project initialized".green());

        let design = self.design(client).await;
        print_stage("Component Design", &design);

        let implementation = self.implement(client).await;
        print_stage("Component Implementation", &implementation);

        let review = self.review(client).await;
        print_stage("Component Review", &review);

        let docs = self.document(client).await;
        print_stage("Component Documentation", &docs);

        self.save(dir)
    }

    /// Seeds the project context the whole team sees in every query.
    fn initialize(&mut self) {
        let context = &mut self.team.context;
        context.name = format!("{} Component", self.name);
        context.requirements = vec![
            self.description.clone(),
            "Clean, modern UI".to_string(),
            "Responsive design".to_string(),
        ];
        context
            .status
            .insert("requirements_complete".to_string(), json!(true));
        context
            .status
            .insert("architecture_complete".to_string(), json!(false));
        context
            .status
            .insert("frontend_progress".to_string(), json!(0));
        context
            .status
            .insert("testing_progress".to_string(), json!(0));
    }

    async fn design(&mut self, client: &ChatClient) -> String {
        self.team.focus("Software Architect");
        let query = format!(
            "Design the architecture for the {} component.\n\n\
             Component description: {}\n\n\
             We need to determine:\n\
             1. Component structure\n\
             2. State management approach\n\
             3. Data flow between components\n\
             4. UI/UX considerations\n\n\
             Please provide a comprehensive design that covers these aspects.",
            self.name, self.description
        );
        let response = self.team.process_query(client, &query).await;

        let context = &mut self.team.context;
        context
            .architecture
            .insert("design_complete".to_string(), json!(true));
        context.architecture.insert(
            "description".to_string(),
            json!(format!("{} Component Architecture", self.name)),
        );
        context
            .status
            .insert("architecture_complete".to_string(), json!(true));

        response
    }

    async fn implement(&mut self, client: &ChatClient) -> String {
        self.team.focus("Frontend Developer");
        let query = format!(
            "Create a complete React implementation of the {} component based on our design.\n\n\
             Component description: {}\n\n\
             Please provide all necessary files with proper file naming. Start each code block \
             with ```jsx {}.jsx or ```css {}.css to clearly indicate the file name, and include \
             any sub-components the design calls for.",
            self.name, self.description, self.name, self.name
        );
        let response = self.team.process_query(client, &query).await;

        self.files.merge(self.extractor.extract(&response));
        self.team
            .context
            .status
            .insert("frontend_progress".to_string(), json!(100));

        response
    }

    async fn review(&mut self, client: &ChatClient) -> String {
        self.team.focus("QA Tester");
        let query = format!(
            "Review our {} component implementation and identify any potential issues or \
             improvements.\n\n\
             Focus on:\n\
             1. Functionality testing\n\
             2. Edge cases\n\
             3. User experience\n\
             4. Accessibility\n\
             5. Performance considerations\n\n\
             Please provide a comprehensive test report.",
            self.name
        );
        let response = self.team.process_query(client, &query).await;

        self.team
            .context
            .status
            .insert("testing_progress".to_string(), json!(100));

        response
    }

    async fn document(&mut self, client: &ChatClient) -> String {
        self.team.focus("Technical Writer");
        let query = format!(
            "Create comprehensive documentation for the {} component.\n\n\
             Include:\n\
             1. Overview of the component\n\
             2. Installation instructions\n\
             3. Usage examples\n\
             4. Props/API documentation\n\
             5. Customization options",
            self.name
        );
        let response = self.team.process_query(client, &query).await;

        self.files.merge(self.extractor.extract(&response));
        if !self.files.contains("README.md") {
            self.files.insert("README.md", response.clone());
        }

        response
    }

    fn save(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let written = self.files.write_to(dir)?;
        for path in &written {
            println!("Saved file: {}", path.display());
        }
        Ok(written)
    }
}

fn print_stage(title: &str, body: &str) {
    println!("\n{}", format!("--- {title} ---").cyan());
    println!("{body}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_seeds_context_and_counters() {
        let mut builder = ComponentBuilder::new("TodoList", "A todo list with add and delete");
        builder.initialize();

        let context = &builder.team.context;
        assert_eq!(context.name, "TodoList Component");
        assert_eq!(context.requirements[0], "A todo list with add and delete");
        assert_eq!(context.status["requirements_complete"], json!(true));
        assert_eq!(context.status["frontend_progress"], json!(0));
    }

    #[test]
    fn save_writes_collected_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut builder = ComponentBuilder::new("TodoList", "desc");
        builder.files.insert("TodoList.jsx", "const x = 1;");
        builder.files.insert("README.md", "# TodoList");

        let written = builder.save(dir.path()).expect("save succeeds");

        assert_eq!(written.len(), 2);
        assert!(dir.path().join("TodoList.jsx").exists());
    }
}
