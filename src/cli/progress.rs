use indicatif::ProgressBar;

use crate::core::action::FixAction;

#[derive(Clone)]
pub struct FixProgress {
    bar: ProgressBar,
}

impl FixProgress {
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            indicatif::ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner()),
        );
        bar.set_length(total as u64);
        bar.set_message(format!("Applying {} fix(es)...", total));
        bar.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { bar }
    }

    pub fn realized(&self, action: &FixAction) {
        self.bar.inc(1);
        self.bar.set_message(format!(
            "Applying... [{} {}]",
            action.violation().rule,
            action.violation().document
        ));
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
