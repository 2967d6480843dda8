//! The compiled-content facade handed to the request layer.
//!
//! One `Catalog` owns the shared repository, the per-kind compile caches,
//! and the locale tables. Compilation runs on blocking workers behind a
//! semaphore so a burst of cold-cache requests can't monopolize the
//! runtime's blocking pool.
//!
//! Caching matches the serving contract: localized kinds (backgrounds,
//! playlists, engines, levels) cache one list per resolved locale; the
//! rest cache a single list. A cached list is served as-is until
//! explicitly invalidated, even if the files underneath have changed.

use crate::compile::{backgrounds, banner, effects, engines, particles, playlists, posts, skins, Context, Kind};
use crate::descriptor::{self, EngineDescriptor};
use crate::error::{ErrorKind, Result};
use crate::levels;
use crate::locale::LocaleManager;
use crate::models::{
    BackgroundItem, EffectItem, EngineItem, LevelItem, ParticleRecord, PlaylistItem, PostItem, SkinRecord,
};
use crate::options::OptionValidators;
use exn::ResultExt;
use fermata_cache::MemoMap;
use fermata_config::{Config, FailurePolicy};
use fermata_repository::{AssetReference, Repository, RepositoryHandle};
use std::sync::Arc;
use tokio::sync::Semaphore;

pub struct Catalog {
    repo: RepositoryHandle,
    locales: LocaleManager,
    config: Config,
    permits: Arc<Semaphore>,
    backgrounds: MemoMap<String, Arc<Vec<BackgroundItem>>>,
    effects: MemoMap<(), Arc<Vec<EffectItem>>>,
    particles: MemoMap<(), Arc<Vec<ParticleRecord>>>,
    skins: MemoMap<(), Arc<Vec<SkinRecord>>>,
    engines: MemoMap<String, Arc<Vec<EngineItem>>>,
    posts: MemoMap<(), Arc<Vec<PostItem>>>,
    playlists: MemoMap<String, Arc<Vec<PlaylistItem>>>,
    levels: MemoMap<String, Arc<Vec<LevelItem>>>,
    banner: MemoMap<(), Option<AssetReference>>,
}

impl Catalog {
    pub fn new(config: Config) -> Self {
        let repo = Arc::new(Repository::new(&config.content.repository_prefix));
        Self {
            repo,
            locales: LocaleManager::new(&config.compile.default_locale),
            permits: Arc::new(Semaphore::new(config.compile.workers)),
            config,
            backgrounds: MemoMap::new(),
            effects: MemoMap::new(),
            particles: MemoMap::new(),
            skins: MemoMap::new(),
            engines: MemoMap::new(),
            posts: MemoMap::new(),
            playlists: MemoMap::new(),
            levels: MemoMap::new(),
            banner: MemoMap::new(),
        }
    }

    /// The shared content-addressed repository, for serving asset bytes.
    pub fn repository(&self) -> RepositoryHandle {
        Arc::clone(&self.repo)
    }

    pub fn locales(&self) -> &LocaleManager {
        &self.locales
    }

    pub async fn backgrounds(&self, source: Option<&str>, locale: &str) -> Result<Arc<Vec<BackgroundItem>>> {
        let (messages, cache_locale) = self.locales.get(locale);
        let ctx = self.context(Kind::Background, source);
        self.backgrounds
            .get_or_try_compile(cache_locale.to_string(), || async move {
                self.run_blocking(move || backgrounds::compile(&ctx, messages)).await.map(Arc::new)
            })
            .await
    }

    pub async fn effects(&self, source: Option<&str>) -> Result<Arc<Vec<EffectItem>>> {
        let ctx = self.context(Kind::Effect, source);
        self.effects
            .get_or_try_compile((), || async move {
                self.run_blocking(move || effects::compile(&ctx)).await.map(Arc::new)
            })
            .await
    }

    pub async fn particles(&self, source: Option<&str>) -> Result<Arc<Vec<ParticleRecord>>> {
        let ctx = self.context(Kind::Particle, source);
        self.particles
            .get_or_try_compile((), || async move {
                self.run_blocking(move || particles::compile(&ctx)).await.map(Arc::new)
            })
            .await
    }

    pub async fn skins(&self, source: Option<&str>) -> Result<Arc<Vec<SkinRecord>>> {
        let ctx = self.context(Kind::Skin, source);
        self.skins
            .get_or_try_compile((), || async move {
                self.run_blocking(move || skins::compile(&ctx)).await.map(Arc::new)
            })
            .await
    }

    /// Compiled engines, sorted for display. The dependency kinds are
    /// compiled (or served from cache) first; the engine pass itself only
    /// resolves names against those lists.
    pub async fn engines(&self, source: Option<&str>, locale: &str) -> Result<Arc<Vec<EngineItem>>> {
        let (_, cache_locale) = self.locales.get(locale);
        let skins = self.skins(source).await?;
        let effects = self.effects(source).await?;
        let particles = self.particles(source).await?;
        let backgrounds = self.backgrounds(source, locale).await?;
        let ctx = self.context(Kind::Engine, source);
        let compile_locale = cache_locale.to_string();
        self.engines
            .get_or_try_compile(cache_locale.to_string(), || async move {
                self.run_blocking(move || {
                    let deps = engines::Dependencies {
                        skins: &skins,
                        effects: &effects,
                        particles: &particles,
                        backgrounds: &backgrounds,
                    };
                    engines::compile(&ctx, &compile_locale, &deps)
                })
                .await
                .map(Arc::new)
            })
            .await
    }

    /// Compiled posts, in name order. Callers wanting announcement order
    /// apply [`sort_posts_by_newest`](crate::sort_posts_by_newest).
    pub async fn posts(&self, source: Option<&str>) -> Result<Arc<Vec<PostItem>>> {
        let ctx = self.context(Kind::Post, source);
        self.posts
            .get_or_try_compile((), || async move {
                self.run_blocking(move || posts::compile(&ctx)).await.map(Arc::new)
            })
            .await
    }

    pub async fn playlists(&self, source: Option<&str>, locale: &str) -> Result<Arc<Vec<PlaylistItem>>> {
        let (messages, cache_locale) = self.locales.get(locale);
        let ctx = self.context(Kind::Playlist, source);
        self.playlists
            .get_or_try_compile(cache_locale.to_string(), || async move {
                self.run_blocking(move || playlists::compile(&ctx, messages)).await.map(Arc::new)
            })
            .await
    }

    pub async fn levels(&self, source: Option<&str>, locale: &str) -> Result<Arc<Vec<LevelItem>>> {
        let (_, cache_locale) = self.locales.get(locale);
        let engines = self.engines(source, locale).await?;
        let ctx = self.context(Kind::Level, source);
        let levels_root = self.config.content.levels_root.clone();
        self.levels
            .get_or_try_compile(cache_locale.to_string(), || async move {
                self.run_blocking(move || levels::compile(&ctx, &levels_root, &engines)).await.map(Arc::new)
            })
            .await
    }

    /// The server banner, if one is shipped.
    pub async fn banner(&self) -> Result<Option<AssetReference>> {
        let ctx = self.context(Kind::Banner, None);
        self.banner
            .get_or_try_compile((), || async move { self.run_blocking(move || banner::compile(&ctx)).await })
            .await
    }

    /// Replay option validators for a rankable engine; `None` when the
    /// engine isn't rankable.
    pub async fn replay_validators(&self, engine: &str) -> Result<Option<OptionValidators>> {
        let dir = self.config.content.root.join(Kind::Engine.dir_name()).join(engine);
        self.run_blocking(move || {
            let descriptor: EngineDescriptor = descriptor::read_json(&dir.join(Kind::Engine.descriptor_name()))?;
            if !descriptor.can_be_ranked {
                return Ok(None);
            }
            let configuration_path = dir.join("EngineConfiguration");
            let compressed = std::fs::read(&configuration_path).map_err(ErrorKind::Io)?;
            OptionValidators::from_gzip(&compressed, &descriptor.unrankable_options, &configuration_path).map(Some)
        })
        .await
    }

    /// Drop the cached lists for one kind. The next request recompiles
    /// from current disk state.
    pub fn invalidate(&self, kind: Kind) {
        tracing::info!(kind = %kind, "invalidating compile cache");
        match kind {
            Kind::Background => self.backgrounds.invalidate_all(),
            Kind::Effect => self.effects.invalidate_all(),
            Kind::Particle => self.particles.invalidate_all(),
            Kind::Skin => self.skins.invalidate_all(),
            Kind::Engine => self.engines.invalidate_all(),
            Kind::Post => self.posts.invalidate_all(),
            Kind::Playlist => self.playlists.invalidate_all(),
            Kind::Level => self.levels.invalidate_all(),
            Kind::Banner => self.banner.invalidate_all(),
        }
    }

    /// Drop every cached list.
    pub fn invalidate_all(&self) {
        tracing::info!("invalidating all compile caches");
        self.backgrounds.invalidate_all();
        self.effects.invalidate_all();
        self.particles.invalidate_all();
        self.skins.invalidate_all();
        self.engines.invalidate_all();
        self.posts.invalidate_all();
        self.playlists.invalidate_all();
        self.levels.invalidate_all();
        self.banner.invalidate_all();
    }

    fn context(&self, kind: Kind, source: Option<&str>) -> Context {
        let policy = &self.config.compile.policy;
        Context {
            repo: Arc::clone(&self.repo),
            root: self.config.content.root.clone(),
            policy: match kind {
                Kind::Background => policy.backgrounds,
                Kind::Effect => policy.effects,
                Kind::Particle => policy.particles,
                Kind::Skin => policy.skins,
                Kind::Engine => policy.engines,
                Kind::Post => policy.posts,
                Kind::Playlist => policy.playlists,
                Kind::Level => policy.levels,
                // The banner has no instances to be lenient about.
                Kind::Banner => FailurePolicy::Skip,
            },
            source: source.map(str::to_string),
        }
    }

    /// Run a compilation job on the blocking pool, bounded by the worker
    /// semaphore.
    async fn run_blocking<T, F>(&self, job: F) -> Result<T>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .or_raise(|| ErrorKind::Worker("worker pool closed".to_string()))?;
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            job()
        })
        .await
        .map_err(|e| ErrorKind::Worker(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::testutil::write_instance;
    use fermata_config::{CompileConfig, ContentConfig, PolicyConfig};
    use std::fs;
    use std::path::Path;

    fn catalog(root: &Path) -> Catalog {
        Catalog::new(Config {
            content: ContentConfig {
                root: root.to_path_buf(),
                levels_root: root.join("levels"),
                ..ContentConfig::default()
            },
            compile: CompileConfig {
                workers: 4,
                default_locale: "en".to_string(),
                policy: PolicyConfig::default(),
            },
        })
    }

    fn seed_effect(root: &Path, name: &str, title: &str) {
        write_instance(
            root,
            Kind::Effect,
            name,
            &format!(r#"{{"version": 5, "title": "{title}", "subtitle": "s", "author": "a"}}"#),
            &["thumbnail.png", "data", "audio"],
        );
    }

    #[tokio::test]
    async fn cache_hit_serves_stale_list_until_invalidated() {
        let dir = tempfile::tempdir().unwrap();
        seed_effect(dir.path(), "clap", "Clap");
        let catalog = catalog(dir.path());

        let first = catalog.effects(None).await.unwrap();
        assert_eq!(first.len(), 1);

        // New content on disk is invisible to the cached list.
        seed_effect(dir.path(), "snare", "Snare");
        let second = catalog.effects(None).await.unwrap();
        assert_eq!(second.len(), 1);

        // Invalidation forces a recompile from current disk state.
        catalog.invalidate(Kind::Effect);
        let third = catalog.effects(None).await.unwrap();
        assert_eq!(third.len(), 2);
    }

    #[tokio::test]
    async fn localized_kinds_cache_per_resolved_locale() {
        let dir = tempfile::tempdir().unwrap();
        write_instance(
            dir.path(),
            Kind::Playlist,
            "uploads",
            r##"{"version": 1, "title": "#UPLOADED", "subtitle": "s", "author": "a"}"##,
            &[],
        );
        let catalog = catalog(dir.path());
        let en = catalog.playlists(None, "en").await.unwrap();
        // An unknown locale resolves to the default and shares its entry.
        let unknown = catalog.playlists(None, "xx").await.unwrap();
        assert!(Arc::ptr_eq(&en, &unknown));
    }

    #[tokio::test]
    async fn banner_is_cached_and_invalidatable() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = catalog(dir.path());
        assert!(catalog.banner().await.unwrap().is_none());

        fs::create_dir_all(dir.path().join("banner")).unwrap();
        fs::write(dir.path().join("banner/banner.png"), b"png").unwrap();
        // Still absent: the empty result was cached.
        assert!(catalog.banner().await.unwrap().is_none());

        catalog.invalidate(Kind::Banner);
        assert!(catalog.banner().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn invalidate_all_clears_every_kind() {
        let dir = tempfile::tempdir().unwrap();
        seed_effect(dir.path(), "clap", "Clap");
        let catalog = catalog(dir.path());
        catalog.effects(None).await.unwrap();
        catalog.posts(None).await.unwrap();
        catalog.invalidate_all();
        seed_effect(dir.path(), "snare", "Snare");
        assert_eq!(catalog.effects(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn source_is_stamped_onto_items() {
        let dir = tempfile::tempdir().unwrap();
        seed_effect(dir.path(), "clap", "Clap");
        let catalog = catalog(dir.path());
        let items = catalog.effects(Some("https://fermata.example")).await.unwrap();
        assert_eq!(items[0].source.as_deref(), Some("https://fermata.example"));
    }

    #[tokio::test]
    async fn replay_validators_absent_for_unrankable_engine() {
        let dir = tempfile::tempdir().unwrap();
        write_instance(
            dir.path(),
            Kind::Engine,
            "casual",
            r#"{
                "title": "Casual", "subtitle": "s", "author": "a",
                "skin_name": "base", "effect_name": "fx",
                "particle_name": "px", "background_name": "bg"
            }"#,
            &[],
        );
        let catalog = catalog(dir.path());
        assert!(catalog.replay_validators("casual").await.unwrap().is_none());
    }
}
