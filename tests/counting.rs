use kira_divseq_kmer_vector::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_counts_acgt_k1() {
    let codec = KmerCodec::new(4, 1).unwrap();
    let seq = Alphabet::dna().encode_seq(b"ACGT");
    let counts = kmer_counts(&seq, &codec, CountStorage::Dense).unwrap();
    assert_eq!(counts.len(), 4);
    for index in 0..4 {
        assert_eq!(counts.get(index).unwrap(), 1);
    }
    assert!(close(counts.entropy(), 2.0));
}

#[test]
fn test_counts_aaaa_k1() {
    let codec = KmerCodec::new(4, 1).unwrap();
    let seq = Alphabet::dna().encode_seq(b"AAAA");
    let counts = kmer_counts(&seq, &codec, CountStorage::Dense).unwrap();
    assert_eq!(counts.get(0).unwrap(), 4);
    for index in 1..4 {
        assert_eq!(counts.get(index).unwrap(), 0);
    }
    assert_eq!(counts.entropy(), 0.0);
}

#[test]
fn test_window_total_without_ambiguity() {
    let seq = Alphabet::dna().encode_seq(b"ACGCG");
    for k in 1..=3usize {
        let codec = KmerCodec::new(4, k).unwrap();
        let counts = kmer_counts(&seq, &codec, CountStorage::Dense).unwrap();
        assert_eq!(counts.len(), 4u64.pow(k as u32));
        assert_eq!(counts.sum() as usize, seq.len() - k + 1);
    }
}

#[test]
fn test_ambiguous_windows_excluded() {
    let codec = KmerCodec::new(4, 2).unwrap();
    let seq = Alphabet::dna().encode_seq(b"ACNGT");
    // only AC and GT avoid the ambiguous middle position
    let indices = kmer_indices(&seq, &codec);
    assert_eq!(indices, vec![1, 11]);

    let counts = kmer_counts(&seq, &codec, CountStorage::Dense).unwrap();
    assert_eq!(counts.sum(), 2);
    assert_eq!(counts.get(1).unwrap(), 1);
    assert_eq!(counts.get(11).unwrap(), 1);
}

#[test]
fn test_leading_and_trailing_ambiguity() {
    let codec = KmerCodec::new(4, 2).unwrap();

    let seq = Alphabet::dna().encode_seq(b"NACG");
    assert_eq!(kmer_indices(&seq, &codec), vec![1, 6]); // AC, CG

    let seq = Alphabet::dna().encode_seq(b"ACN");
    assert_eq!(kmer_indices(&seq, &codec), vec![1]); // AC only
}

#[test]
fn test_consecutive_ambiguity_resets_window() {
    let codec = KmerCodec::new(4, 3).unwrap();
    // every window touches at least one N
    let seq = Alphabet::dna().encode_seq(b"ACNNGT");
    assert!(kmer_indices(&seq, &codec).is_empty());

    let counts = kmer_counts(&seq, &codec, CountStorage::Sparse).unwrap();
    assert_eq!(counts.sum(), 0);
}

#[test]
fn test_all_ambiguous() {
    let codec = KmerCodec::new(4, 1).unwrap();
    let seq = Alphabet::dna().encode_seq(b"NNN");
    assert!(kmer_indices(&seq, &codec).is_empty());
    let counts = kmer_counts(&seq, &codec, CountStorage::Dense).unwrap();
    assert_eq!(counts.sum(), 0);
    assert_eq!(counts.entropy(), 0.0);
}

#[test]
fn test_short_seq_yields_no_windows() {
    let codec = KmerCodec::new(4, 3).unwrap();
    let seq = Alphabet::dna().encode_seq(b"AC");
    assert!(kmer_indices(&seq, &codec).is_empty());
    let counts = kmer_counts(&seq, &codec, CountStorage::Dense).unwrap();
    assert_eq!(counts.sum(), 0);

    let empty: &[u8] = &[];
    assert!(kmer_indices(empty, &codec).is_empty());
}

#[test]
fn test_storage_modes_agree() {
    let codec = KmerCodec::new(4, 2).unwrap();
    let seq = Alphabet::dna().encode_seq(b"ACGTNNACGACGTTT");
    let dense = kmer_counts(&seq, &codec, CountStorage::Dense).unwrap();
    let sparse = kmer_counts(&seq, &codec, CountStorage::Sparse).unwrap();
    assert!(!dense.is_sparse());
    assert!(sparse.is_sparse());
    assert_eq!(dense, sparse);
    assert_eq!(dense.sum(), sparse.sum());
}

#[test]
fn test_kmer_strings_round_trip() {
    let alphabet = Alphabet::dna();
    let codec = KmerCodec::new(4, 2).unwrap();
    let seq = alphabet.encode_seq(b"ACGCG");
    let counts = kmer_counts(&seq, &codec, CountStorage::Sparse).unwrap();

    let mut got = Vec::new();
    for (index, count) in counts.iter_nonzero() {
        let words = codec.decode_to_symbols(&[index], &alphabet).unwrap();
        got.push((words[0].clone(), count));
    }
    got.sort();
    assert_eq!(
        got,
        vec![
            (b"AC".to_vec(), 1),
            (b"CG".to_vec(), 2),
            (b"GC".to_vec(), 1),
        ]
    );
}
