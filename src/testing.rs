//! Test doubles shared by the unit tests.

use std::sync::Mutex;

use rustc_hash::FxHashSet;

use crate::download::Fetcher;
use crate::error::FetchError;
use crate::iso::ValueRange;
use crate::renderer::{MapAppearance, Renderer, RendererError, ShowSpec};
use crate::resources::{FragmentKey, ResourceRef};

pub(crate) const SAMPLE_PDB: &str = "\
HEADER    WATER PEAKS
ATOM      1  P     A A   1       1.000   2.000   3.000  1.00  0.00           P
HETATM    2  O   HOH W   1       4.000   5.000   6.000  1.00  0.00           O
END
";

/// Little-endian mode 2 CCP4 map holding `values` along one row.
pub(crate) fn ccp4_map(values: &[f32]) -> Vec<u8> {
    let mut map = vec![0u8; 1024];
    let put = |map: &mut Vec<u8>, offset: usize, bytes: [u8; 4]| {
        map[offset..offset + 4].copy_from_slice(&bytes);
    };
    put(&mut map, 0, (values.len() as i32).to_le_bytes());
    put(&mut map, 4, 1i32.to_le_bytes());
    put(&mut map, 8, 1i32.to_le_bytes());
    put(&mut map, 12, 2i32.to_le_bytes());
    let min = values.iter().copied().fold(f32::INFINITY, f32::min);
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    put(&mut map, 76, min.to_le_bytes());
    put(&mut map, 80, max.to_le_bytes());
    put(&mut map, 208, *b"MAP ");
    put(&mut map, 212, [0x44, 0x41, 0, 0]);
    for v in values {
        map.extend_from_slice(&v.to_le_bytes());
    }
    map
}

/// Serves canned payloads for every URL except the ones told to fail.
pub(crate) struct MockFetcher {
    failing: Vec<String>,
    requested: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub(crate) fn serving_all() -> Self {
        Self {
            failing: Vec::new(),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Fail every URL containing `pattern`.
    pub(crate) fn failing(mut self, pattern: &str) -> Self {
        self.failing.push(pattern.to_owned());
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.requested.lock().unwrap().len()
    }

    /// Number of requests made for resources of `key`.
    pub(crate) fn calls_for(&self, key: &FragmentKey) -> usize {
        let prefix = format!("{key}_");
        self.requested
            .lock()
            .unwrap()
            .iter()
            .filter(|url| url.contains(&prefix))
            .count()
    }

    fn request(&self, url: &str) -> Result<(), FetchError> {
        self.requested.lock().unwrap().push(url.to_owned());
        if self.failing.iter().any(|p| url.contains(p.as_str())) {
            return Err(FetchError::new(url, "404 Not Found"));
        }
        Ok(())
    }
}

impl Fetcher for MockFetcher {
    fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        self.request(url)?;
        Ok(SAMPLE_PDB.to_owned())
    }

    fn fetch_binary(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.request(url)?;
        Ok(ccp4_map(&[0.0, 25.0]))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Op {
    Register,
    Show,
    Update,
    Hide,
    Unload,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Register(ResourceRef),
    Show(ResourceRef, ShowSpec),
    Update(ResourceRef, MapAppearance),
    Hide(ResourceRef),
    Unload(ResourceRef),
}

/// Records every call; every volume reports the same range.
pub(crate) struct RecordingRenderer {
    pub(crate) calls: Vec<Call>,
    pub(crate) registered: FxHashSet<ResourceRef>,
    pub(crate) shown: FxHashSet<ResourceRef>,
    pub(crate) range: ValueRange,
    failures: FxHashSet<(Op, ResourceRef)>,
}

impl RecordingRenderer {
    pub(crate) fn new() -> Self {
        Self {
            calls: Vec::new(),
            registered: FxHashSet::default(),
            shown: FxHashSet::default(),
            range: ValueRange::new(0.0, 25.0),
            failures: FxHashSet::default(),
        }
    }

    pub(crate) fn fail(&mut self, op: Op, resource: ResourceRef) {
        let _ = self.failures.insert((op, resource));
    }

    pub(crate) fn clear_failures(&mut self) {
        self.failures.clear();
    }

    /// Whether any resource of `key` is registered.
    pub(crate) fn holds_any(&self, key: &FragmentKey) -> bool {
        let prefix = format!("{key}_");
        self.registered.iter().any(|r| r.as_str().starts_with(&prefix))
    }

    pub(crate) fn count(&self, op: Op) -> usize {
        self.calls
            .iter()
            .filter(|c| {
                matches!(
                    (op, c),
                    (Op::Register, Call::Register(_))
                        | (Op::Show, Call::Show(..))
                        | (Op::Update, Call::Update(..))
                        | (Op::Hide, Call::Hide(_))
                        | (Op::Unload, Call::Unload(_))
                )
            })
            .count()
    }

    fn check(&self, op: Op, resource: &ResourceRef) -> Result<(), RendererError> {
        if self.failures.contains(&(op, resource.clone())) {
            return Err(RendererError::Backend(format!("{op:?} failed for {resource}")));
        }
        Ok(())
    }

    fn register(&mut self, resource: &ResourceRef) -> Result<(), RendererError> {
        self.check(Op::Register, resource)?;
        self.calls.push(Call::Register(resource.clone()));
        let _ = self.registered.insert(resource.clone());
        Ok(())
    }
}

impl Renderer for RecordingRenderer {
    fn register_structure(
        &mut self,
        _data: &str,
        resource: &ResourceRef,
    ) -> Result<(), RendererError> {
        self.register(resource)
    }

    fn register_volume(
        &mut self,
        _data: &[u8],
        resource: &ResourceRef,
    ) -> Result<(), RendererError> {
        self.register(resource)
    }

    fn volume_range(
        &self,
        resource: &ResourceRef,
    ) -> Result<ValueRange, RendererError> {
        if self.registered.contains(resource) {
            Ok(self.range)
        } else {
            Err(RendererError::UnknownResource(resource.clone()))
        }
    }

    fn show(
        &mut self,
        resource: &ResourceRef,
        spec: &ShowSpec,
    ) -> Result<(), RendererError> {
        self.check(Op::Show, resource)?;
        if !self.registered.contains(resource) {
            return Err(RendererError::UnknownResource(resource.clone()));
        }
        self.calls.push(Call::Show(resource.clone(), *spec));
        let _ = self.shown.insert(resource.clone());
        Ok(())
    }

    fn update_density_map(
        &mut self,
        resource: &ResourceRef,
        appearance: &MapAppearance,
    ) -> Result<(), RendererError> {
        self.check(Op::Update, resource)?;
        self.calls.push(Call::Update(resource.clone(), *appearance));
        Ok(())
    }

    fn hide(&mut self, resource: &ResourceRef) -> Result<(), RendererError> {
        self.check(Op::Hide, resource)?;
        self.calls.push(Call::Hide(resource.clone()));
        let _ = self.shown.remove(resource);
        Ok(())
    }

    fn unload(&mut self, resource: &ResourceRef) -> Result<(), RendererError> {
        self.check(Op::Unload, resource)?;
        self.calls.push(Call::Unload(resource.clone()));
        let _ = self.shown.remove(resource);
        let _ = self.registered.remove(resource);
        Ok(())
    }
}
