use super::error::FingerprintError;
use super::frame::FrameFingerprint;
use crate::core::models::ids::{ResidueId, ResiduePair};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// Column key of the tabular view: ligand residue, target residue, interaction name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
    pub ligand: ResidueId,
    pub protein: ResidueId,
    pub interaction: String,
}

/// Frame-indexed table of detected interactions.
///
/// Rows are frames, labelled by source frame number; columns are
/// `(ligand, protein, interaction)` keys. Absent interactions are `T::from(false)`.
#[derive(Debug, Clone, PartialEq)]
pub struct FingerprintTable<T> {
    columns: Vec<Column>,
    frames: Vec<usize>,
    rows: Vec<Vec<T>>,
}

impl<T> FingerprintTable<T> {
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<T>] {
        &self.rows
    }

    /// Source frame number of each row.
    pub fn frames(&self) -> &[usize] {
        &self.frames
    }

    pub fn n_frames(&self) -> usize {
        self.rows.len()
    }

    /// Row holding source frame `frame`.
    pub fn row_of(&self, frame: usize) -> Option<usize> {
        self.frames.iter().position(|&f| f == frame)
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, ligand: &ResidueId, protein: &ResidueId, interaction: &str) -> Option<usize> {
        self.columns.iter().position(|c| {
            &c.ligand == ligand && &c.protein == protein && c.interaction == interaction
        })
    }

    pub fn get(&self, row: usize, column: usize) -> Option<&T> {
        self.rows.get(row).and_then(|row| row.get(column))
    }
}

impl<T: From<bool>> FingerprintTable<T> {
    /// Builds the table of `ifp` over the interactions in `interactions`, in that order.
    ///
    /// Pairs appear in the order they are first seen across frames. With `drop_empty`
    /// only interactions detected in at least one frame get a column; otherwise every
    /// observed pair gets one column per interaction.
    pub fn build(ifp: &[FrameFingerprint], interactions: &[String], drop_empty: bool) -> Self {
        let mut pairs: Vec<&ResiduePair> = Vec::new();
        let mut seen: HashSet<&ResiduePair> = HashSet::new();
        for pair in ifp.iter().flat_map(|frame| frame.pairs()) {
            if seen.insert(pair) {
                pairs.push(pair);
            }
        }

        let keys: Vec<(&ResiduePair, &str)> = pairs
            .into_iter()
            .flat_map(|pair| interactions.iter().map(move |name| (pair, name.as_str())))
            .filter(|&(pair, name)| {
                !drop_empty
                    || ifp.iter().any(|frame| {
                        frame.get_pair(pair).is_some_and(|data| data.contains_key(name))
                    })
            })
            .collect();

        let rows = ifp
            .iter()
            .map(|frame| {
                keys.iter()
                    .map(|&(pair, name)| {
                        T::from(frame.get_pair(pair).is_some_and(|data| data.contains_key(name)))
                    })
                    .collect()
            })
            .collect();

        let columns = keys
            .into_iter()
            .map(|((ligand, protein), name)| Column {
                ligand: ligand.clone(),
                protein: protein.clone(),
                interaction: name.to_string(),
            })
            .collect();
        let frames = ifp.iter().map(FrameFingerprint::frame).collect();
        Self {
            columns,
            frames,
            rows,
        }
    }
}

impl<T: fmt::Display> FingerprintTable<T> {
    /// Writes the table as CSV: three header rows (`ligand`, `protein`, `interaction`),
    /// then one row per frame starting with its source frame number.
    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> Result<(), FingerprintError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        let header = |label: &str, field: fn(&Column) -> String| {
            std::iter::once(label.to_string())
                .chain(self.columns.iter().map(field))
                .collect::<Vec<_>>()
        };
        csv_writer.write_record(header("ligand", |c| c.ligand.to_string()))?;
        csv_writer.write_record(header("protein", |c| c.protein.to_string()))?;
        csv_writer.write_record(header("interaction", |c| c.interaction.clone()))?;

        for (frame, row) in self.frames.iter().zip(&self.rows) {
            csv_writer.write_record(
                std::iter::once(frame.to_string()).chain(row.iter().map(|v| v.to_string())),
            )?;
        }
        csv_writer.flush().map_err(|e| FingerprintError::Io {
            path: "<csv writer>".to_string(),
            source: e,
        })?;
        Ok(())
    }

    pub fn to_csv_path(&self, path: &Path) -> Result<(), FingerprintError> {
        let file = std::fs::File::create(path).map_err(|e| FingerprintError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        self.write_csv(file)
    }
}

const WORD_BITS: usize = u64::BITS as usize;

/// A fixed-length bit sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BitVector {
    words: Vec<u64>,
    len: usize,
}

impl BitVector {
    pub fn zeros(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD_BITS)],
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        (index < self.len).then(|| (self.words[index / WORD_BITS] >> (index % WORD_BITS)) & 1 == 1)
    }

    /// Sets bit `index`. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, value: bool) {
        if index >= self.len {
            return;
        }
        let mask = 1u64 << (index % WORD_BITS);
        let word = &mut self.words[index / WORD_BITS];
        if value {
            *word |= mask;
        } else {
            *word &= !mask;
        }
    }

    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(|&i| self.get(i) == Some(true))
    }

    /// Tanimoto similarity `|a & b| / |a | b|`; two vectors without set bits score 0.
    pub fn tanimoto(&self, other: &BitVector) -> f64 {
        let n_words = self.words.len().max(other.words.len());
        let word = |v: &BitVector, i: usize| v.words.get(i).copied().unwrap_or(0);
        let (both, either) = (0..n_words).fold((0u32, 0u32), |(both, either), i| {
            let (a, b) = (word(self, i), word(other, i));
            (both + (a & b).count_ones(), either + (a | b).count_ones())
        });
        if either == 0 {
            0.0
        } else {
            f64::from(both) / f64::from(either)
        }
    }
}

impl FromIterator<bool> for BitVector {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let bits: Vec<bool> = iter.into_iter().collect();
        let mut vector = Self::zeros(bits.len());
        for (i, bit) in bits.into_iter().enumerate() {
            vector.set(i, bit);
        }
        vector
    }
}

impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.len {
            f.write_str(if self.get(i) == Some(true) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// One bit vector per frame over the columns detected at least once.
pub fn to_bitvectors(ifp: &[FrameFingerprint], interactions: &[String]) -> Vec<BitVector> {
    let table = FingerprintTable::<bool>::build(ifp, interactions, true);
    table
        .rows
        .into_iter()
        .map(|row| row.into_iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::interactions::{Evidence, InteractionData};

    fn id(s: &str) -> ResidueId {
        s.parse().unwrap()
    }

    fn data(names: &[&str]) -> InteractionData {
        names
            .iter()
            .map(|n| (n.to_string(), Evidence::default()))
            .collect()
    }

    fn names() -> Vec<String> {
        vec!["Hydrophobic".to_string(), "HBDonor".to_string()]
    }

    fn ifp() -> Vec<FrameFingerprint> {
        let mut first = FrameFingerprint::new(0);
        first.insert((id("LIG1.G"), id("ASP129.A")), data(&["HBDonor"]));
        let mut second = FrameFingerprint::new(1);
        second.insert((id("LIG1.G"), id("VAL201.A")), data(&["Hydrophobic"]));
        second.insert((id("LIG1.G"), id("ASP129.A")), data(&["HBDonor"]));
        vec![first, second, FrameFingerprint::new(2)]
    }

    #[test]
    fn drop_empty_keeps_only_detected_columns_in_first_seen_order() {
        let table = FingerprintTable::<bool>::build(&ifp(), &names(), true);
        let keys: Vec<(String, String)> = table
            .columns()
            .iter()
            .map(|c| (c.protein.to_string(), c.interaction.clone()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("ASP129.A".to_string(), "HBDonor".to_string()),
                ("VAL201.A".to_string(), "Hydrophobic".to_string()),
            ]
        );
        assert_eq!(table.rows(), &[vec![true, false], vec![true, true], vec![false, false]]);
    }

    #[test]
    fn keeping_empty_columns_gives_pairs_times_interactions() {
        let table = FingerprintTable::<bool>::build(&ifp(), &names(), false);
        assert_eq!(table.n_columns(), 2 * names().len());
        assert_eq!(table.n_frames(), 3);
        let col = table
            .column_index(&id("LIG1.G"), &id("ASP129.A"), "Hydrophobic")
            .unwrap();
        assert_eq!(table.get(1, col), Some(&false));
    }

    #[test]
    fn numeric_cells_use_from_bool() {
        let table = FingerprintTable::<u8>::build(&ifp(), &names(), true);
        assert_eq!(table.rows()[1], vec![1, 1]);
    }

    #[test]
    fn csv_has_three_header_rows() {
        let table = FingerprintTable::<u8>::build(&ifp(), &names(), true);
        let mut buffer = Vec::new();
        table.write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ligand,LIG1.G,LIG1.G");
        assert_eq!(lines[1], "protein,ASP129.A,VAL201.A");
        assert_eq!(lines[2], "interaction,HBDonor,Hydrophobic");
        assert_eq!(lines[3], "0,1,0");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn rows_are_labelled_by_source_frame_number() {
        let strided: Vec<FrameFingerprint> = ifp()
            .into_iter()
            .enumerate()
            .map(|(i, frame)| {
                let mut renumbered = FrameFingerprint::new(i * 10);
                for (pair, data) in frame.iter() {
                    renumbered.insert(pair.clone(), data.clone());
                }
                renumbered
            })
            .collect();
        let table = FingerprintTable::<u8>::build(&strided, &names(), true);
        assert_eq!(table.frames(), &[0, 10, 20]);
        assert_eq!(table.row_of(20), Some(2));
        assert_eq!(table.row_of(1), None);

        let mut buffer = Vec::new();
        table.write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let labels: Vec<&str> = text.lines().skip(3).map(|l| l.split(',').next().unwrap()).collect();
        assert_eq!(labels, vec!["0", "10", "20"]);
    }

    #[test]
    fn csv_file_matches_in_memory_output() {
        let table = FingerprintTable::<bool>::build(&ifp(), &names(), false);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ifp.csv");
        table.to_csv_path(&path).unwrap();
        let mut buffer = Vec::new();
        table.write_csv(&mut buffer).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), buffer);
    }

    #[test]
    fn bitvectors_cover_detected_columns() {
        let bvs = to_bitvectors(&ifp(), &names());
        assert_eq!(bvs.len(), 3);
        assert!(bvs.iter().all(|bv| bv.len() == 2));
        assert_eq!(bvs[0].to_string(), "10");
        assert_eq!(bvs[1].iter_ones().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(bvs[2].count_ones(), 0);
    }

    #[test]
    fn bitvector_bits_and_similarity() {
        let a: BitVector = (0..130).map(|i| i % 2 == 0).collect();
        let b: BitVector = (0..130).map(|i| i % 4 == 0).collect();
        assert_eq!(a.len(), 130);
        assert_eq!(a.get(128), Some(true));
        assert_eq!(a.get(130), None);
        assert_eq!(a.count_ones(), 65);
        assert_eq!(b.count_ones(), 33);
        assert!((a.tanimoto(&b) - 33.0 / 65.0).abs() < 1e-12);
        assert_eq!(a.tanimoto(&a), 1.0);
        assert_eq!(BitVector::zeros(4).tanimoto(&BitVector::zeros(4)), 0.0);
    }
}
