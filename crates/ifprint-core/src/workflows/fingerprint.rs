use crate::core::interactions::{Interaction, InteractionData, InteractionRegistry};
use crate::core::io::{ConverterOptions, StructureConverter, Trajectory};
use crate::core::models::molecule::Molecule;
use crate::core::models::residue::Residue;
use crate::engine::assembler::{EvidenceAssembler, SelectedInteraction};
use crate::engine::config::FingerprintConfig;
use crate::engine::error::FingerprintError;
use crate::engine::export::{self, BitVector, FingerprintTable};
use crate::engine::frame::{FrameFingerprint, ResidueScope, generate_frame};
use crate::engine::parallel::{resolve_n_jobs, run_chunked};
use crate::engine::persist::{self, Snapshot};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, trace};

/// Which registered interactions a [`Fingerprint`] evaluates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InteractionSelection {
    /// Every visible registered interaction, in name order.
    #[default]
    All,
    /// Exactly these interactions, in this order.
    Names(Vec<String>),
}

impl InteractionSelection {
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Names(names.into_iter().map(Into::into).collect())
    }
}

/// Per-call settings of [`Fingerprint::run`].
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub residues: ResidueScope,
    /// Worker count; `None` falls back to the configured default, then to the host's
    /// available parallelism.
    pub n_jobs: Option<usize>,
    /// Converter options for the ligand and target side, in that order.
    pub converter_options: Option<Vec<ConverterOptions>>,
}

/// The interaction fingerprint orchestrator.
///
/// A `Fingerprint` is built once from a registry and an interaction selection. Each
/// of [`generate`](Self::generate), [`run`](Self::run) and
/// [`run_from_iterable`](Self::run_from_iterable) replaces the stored result (the IFP,
/// one [`FrameFingerprint`] per frame), which the export methods then read.
#[derive(Debug)]
pub struct Fingerprint {
    config: FingerprintConfig,
    assembler: EvidenceAssembler,
    bound: BTreeMap<String, Arc<dyn Interaction>>,
    ifp: Option<Vec<FrameFingerprint>>,
}

impl Fingerprint {
    /// Creates a fingerprint with the default configuration.
    pub fn new(
        registry: &InteractionRegistry,
        selection: InteractionSelection,
    ) -> Result<Self, FingerprintError> {
        Self::with_config(registry, selection, FingerprintConfig::default())
    }

    /// Creates a fingerprint, resolving the selected interactions against `registry`.
    ///
    /// Every visible interaction of the registry is bound under its lower-cased name;
    /// the selected ones are bound to the very instances used for detection.
    ///
    /// # Errors
    ///
    /// Returns [`FingerprintError::UnknownInteraction`] listing every selected name that
    /// is not registered or is hidden, or a configuration error.
    pub fn with_config(
        registry: &InteractionRegistry,
        selection: InteractionSelection,
        config: FingerprintConfig,
    ) -> Result<Self, FingerprintError> {
        config.validate()?;

        let names: Vec<String> = match selection {
            InteractionSelection::All => registry
                .visible()
                .map(|entry| entry.name().to_string())
                .collect(),
            InteractionSelection::Names(names) => names,
        };

        let unknown: Vec<String> = names
            .iter()
            .filter(|name| registry.get(name).is_none_or(|entry| entry.is_hidden()))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(FingerprintError::UnknownInteraction { names: unknown });
        }

        let mut bound: BTreeMap<String, Arc<dyn Interaction>> = BTreeMap::new();
        let mut selected = Vec::with_capacity(names.len());
        for name in names {
            let key = name.to_lowercase();
            let detector = match bound.get(&key) {
                Some(detector) => Arc::clone(detector),
                None => {
                    let entry = registry
                        .get(&name)
                        .ok_or_else(|| FingerprintError::UnknownInteraction {
                            names: vec![name.clone()],
                        })?;
                    entry.instantiate()
                }
            };
            bound.insert(key, Arc::clone(&detector));
            selected.push(SelectedInteraction { name, detector });
        }
        for entry in registry.visible() {
            bound
                .entry(entry.name().to_lowercase())
                .or_insert_with(|| entry.instantiate());
        }

        Ok(Self {
            config,
            assembler: EvidenceAssembler::new(selected),
            bound,
            ifp: None,
        })
    }

    /// Lists the names available in `registry`.
    pub fn list_available(registry: &InteractionRegistry, show_hidden: bool) -> Vec<String> {
        registry.list_available(show_hidden)
    }

    pub fn config(&self) -> &FingerprintConfig {
        &self.config
    }

    /// Selected interaction names, in selection order.
    pub fn interactions(&self) -> Vec<String> {
        self.assembler.names().map(str::to_string).collect()
    }

    pub fn n_interactions(&self) -> usize {
        self.assembler.len()
    }

    /// Looks up a bound detector by name, case-insensitively.
    pub fn interaction(&self, name: &str) -> Option<&Arc<dyn Interaction>> {
        self.bound.get(&name.to_lowercase())
    }

    /// Lower-cased names of every bound detector.
    pub fn bound_names(&self) -> impl Iterator<Item = &str> {
        self.bound.keys().map(String::as_str)
    }

    pub fn bitvector(&self, ligand: &Residue, target: &Residue) -> Result<Vec<bool>, FingerprintError> {
        self.assembler.bitvector(ligand, target)
    }

    pub fn metadata(
        &self,
        ligand: &Residue,
        target: &Residue,
    ) -> Result<InteractionData, FingerprintError> {
        self.assembler.metadata(ligand, target)
    }

    /// Fingerprints a single ligand/target structure pair and stores it as a one-frame
    /// IFP.
    #[instrument(skip_all, name = "fingerprint_generate")]
    pub fn generate(
        &mut self,
        ligand: &Molecule,
        target: &Molecule,
        residues: &ResidueScope,
    ) -> Result<&FrameFingerprint, FingerprintError> {
        let frame = generate_frame(
            0,
            &self.assembler,
            ligand,
            target,
            residues,
            self.config.proximity_cutoff,
        )?;
        info!(n_pairs = frame.len(), "Generated single-frame fingerprint.");
        Ok(&self.ifp.insert(vec![frame])[0])
    }

    /// Fingerprints every frame of a trajectory.
    ///
    /// Each frame is read, both selections are converted with their side's converter
    /// options, and the frame fingerprint is appended in trajectory order under the
    /// frame's own number. A [`Strided`](crate::core::io::Strided) view keeps the
    /// numbers of the frames it skips to.
    ///
    /// # Errors
    ///
    /// Fails before reading any frame if the converter options are not exactly two
    /// tables or the worker count is zero. Otherwise the first error aborts the run.
    /// On error the previously stored IFP is kept.
    #[instrument(skip_all, name = "fingerprint_run")]
    pub fn run<T, C>(
        &mut self,
        trajectory: &T,
        converter: &C,
        ligand_selection: &C::Selection,
        target_selection: &C::Selection,
        options: &RunOptions,
    ) -> Result<&[FrameFingerprint], FingerprintError>
    where
        T: Trajectory + ?Sized,
        C: StructureConverter,
    {
        let empty = ConverterOptions::new();
        let (ligand_options, target_options) = match options.converter_options.as_deref() {
            None => (&empty, &empty),
            Some([ligand, target]) => (ligand, target),
            Some(other) => {
                return Err(FingerprintError::ConverterOptionsShape { found: other.len() });
            }
        };
        let n_jobs = resolve_n_jobs(options.n_jobs.or(self.config.default_n_jobs))?;
        let n_frames = trajectory.n_frames();
        info!(n_frames, n_jobs, "Starting trajectory fingerprint.");

        let assembler = &self.assembler;
        let cutoff = self.config.proximity_cutoff;
        let frames = run_chunked(n_frames, n_jobs, |index| {
            trace!(frame = index, "Processing frame.");
            let frame = trajectory.read_frame(index)?;
            let ligand = converter.convert(&frame, ligand_selection, ligand_options)?;
            let target = converter.convert(&frame, target_selection, target_options)?;
            generate_frame(
                frame.number(),
                assembler,
                &ligand,
                &target,
                &options.residues,
                cutoff,
            )
        })?;

        Ok(self.store(frames))
    }

    /// Fingerprints independent ligand structures (e.g. docking poses) against one
    /// fixed target, one frame per ligand, numbered by position.
    #[instrument(skip_all, name = "fingerprint_run_from_iterable")]
    pub fn run_from_iterable<I, L>(
        &mut self,
        ligands: I,
        target: &Molecule,
        residues: &ResidueScope,
        n_jobs: Option<usize>,
    ) -> Result<&[FrameFingerprint], FingerprintError>
    where
        I: IntoIterator<Item = L>,
        L: Borrow<Molecule> + Sync,
    {
        let n_jobs = resolve_n_jobs(n_jobs.or(self.config.default_n_jobs))?;
        let ligands: Vec<L> = ligands.into_iter().collect();
        info!(n_frames = ligands.len(), n_jobs, "Starting fingerprint over ligand structures.");

        let assembler = &self.assembler;
        let cutoff = self.config.proximity_cutoff;
        let frames = run_chunked(ligands.len(), n_jobs, |index| {
            trace!(frame = index, "Processing ligand structure.");
            generate_frame(index, assembler, ligands[index].borrow(), target, residues, cutoff)
        })?;

        Ok(self.store(frames))
    }

    fn store(&mut self, frames: Vec<FrameFingerprint>) -> &[FrameFingerprint] {
        let n_pairs: usize = frames.iter().map(FrameFingerprint::len).sum();
        info!(n_frames = frames.len(), n_pairs, "Fingerprint complete.");
        self.ifp.insert(frames)
    }

    /// The stored IFP.
    ///
    /// # Errors
    ///
    /// Returns [`FingerprintError::NoFingerprint`] before any run.
    pub fn ifp(&self) -> Result<&[FrameFingerprint], FingerprintError> {
        self.ifp.as_deref().ok_or(FingerprintError::NoFingerprint)
    }

    /// The stored fingerprint of source frame `number`, if that frame was processed.
    ///
    /// # Errors
    ///
    /// Returns [`FingerprintError::NoFingerprint`] before any run.
    pub fn frame(&self, number: usize) -> Result<Option<&FrameFingerprint>, FingerprintError> {
        Ok(self.ifp()?.iter().find(|frame| frame.frame() == number))
    }

    /// Tabular view of the IFP; see [`FingerprintTable::build`].
    pub fn to_table<T: From<bool>>(&self, drop_empty: bool) -> Result<FingerprintTable<T>, FingerprintError> {
        Ok(FingerprintTable::build(self.ifp()?, &self.interactions(), drop_empty))
    }

    /// One bit vector per frame over every (pair, interaction) detected at least once.
    pub fn to_bitvectors(&self) -> Result<Vec<BitVector>, FingerprintError> {
        Ok(export::to_bitvectors(self.ifp()?, &self.interactions()))
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            interactions: self.interactions(),
            config: self.config.clone(),
            ifp: self.ifp.clone(),
        }
    }

    /// Serializes the selected interaction names, the configuration and the IFP.
    pub fn to_bytes(&self) -> Result<Vec<u8>, FingerprintError> {
        Ok(persist::encode(&self.snapshot())?.into_bytes())
    }

    pub fn to_path(&self, path: &Path) -> Result<(), FingerprintError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes).map_err(|e| FingerprintError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    /// Restores a fingerprint written by [`to_bytes`](Self::to_bytes).
    ///
    /// Interaction names are resolved against `registry`, which must contain every
    /// custom interaction the fingerprint was built with.
    pub fn from_bytes(bytes: &[u8], registry: &InteractionRegistry) -> Result<Self, FingerprintError> {
        let snapshot = persist::decode(std::str::from_utf8(bytes)?)?;
        let mut fingerprint = Self::with_config(
            registry,
            InteractionSelection::Names(snapshot.interactions),
            snapshot.config,
        )?;
        fingerprint.ifp = snapshot.ifp;
        Ok(fingerprint)
    }

    pub fn from_path(path: &Path, registry: &InteractionRegistry) -> Result<Self, FingerprintError> {
        let bytes = std::fs::read(path).map_err(|e| FingerprintError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_bytes(&bytes, registry)
    }
}
