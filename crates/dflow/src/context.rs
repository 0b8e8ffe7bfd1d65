use crate::GlobalArgs;
use dflow_config::{LoadedSettings, Settings};
use dflow_core::{CardContext, Classifier, DpkgPrecedence, ServerCard, ServerRecord};
use std::path::PathBuf;

/// コマンド実行に必要な設定一式
pub struct Context {
    pub settings: Settings,
    pub settings_source: Option<PathBuf>,
    pub classifier: Classifier,
    pub cards: CardContext,
}

impl Context {
    /// 設定ファイルの値にコマンドラインの指定を重ねる
    pub fn new(loaded: LoadedSettings, args: &GlobalArgs) -> anyhow::Result<Self> {
        let mut settings = loaded.settings;

        if let Some(org) = &args.organisation {
            settings.organisation = Some(org.clone());
        }
        if let Some(max) = args.max_attempts {
            settings.max_connection_attempts = max;
        }
        if args.dpkg_first {
            settings.dpkg_precedence = DpkgPrecedence::DpkgFirst;
        }
        settings.validate()?;

        tracing::debug!(
            organisation = ?settings.organisation,
            max_attempts = settings.max_connection_attempts,
            dpkg_precedence = %settings.dpkg_precedence,
            "resolved settings"
        );

        Ok(Self {
            classifier: Classifier::new(settings.classifier_options()),
            cards: CardContext {
                organisation: settings.organisation.clone(),
            },
            settings_source: loaded.source,
            settings,
        })
    }

    pub fn build_cards(&self, records: &[ServerRecord]) -> Vec<ServerCard> {
        records
            .iter()
            .map(|record| ServerCard::from_record(record, &self.classifier, &self.cards))
            .collect()
    }
}
