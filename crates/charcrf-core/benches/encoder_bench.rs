use candle_core::{DType, Device, Tensor};
use candle_nn::{VarBuilder, VarMap};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use charcrf_core::{CharLstm, CharLstmConfig};

const N_CHARS: usize = 64;

fn one_hot(word: &str) -> Tensor {
    let mut data = vec![0f32; word.len() * N_CHARS];
    for (row, byte) in word.bytes().enumerate() {
        data[row * N_CHARS + (byte as usize % N_CHARS)] = 1.0;
    }
    Tensor::from_vec(data, (word.len(), N_CHARS), &Device::Cpu).unwrap()
}

fn bench_encode(c: &mut Criterion) {
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
    let config = CharLstmConfig::new(N_CHARS, 25);
    let encoder = CharLstm::new(&config, vb).unwrap();

    let sentence: Vec<Tensor> = "John Smith visited Zürich in 2019 , twice"
        .split_whitespace()
        .map(one_hot)
        .collect();

    c.bench_function("char_lstm_encode_single", |b| {
        b.iter(|| encoder.encode(black_box(&sentence[..1])).unwrap());
    });

    c.bench_function("char_lstm_encode_sentence_8", |b| {
        b.iter(|| encoder.encode(black_box(&sentence)).unwrap());
    });
}

criterion_group!(benches, bench_encode);
criterion_main!(benches);
