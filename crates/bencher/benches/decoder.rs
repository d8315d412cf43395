use std::hint::black_box;
use bencher::{TestCase, TestFile};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use micro_icap::codec::ResponseDecoder;
use tokio_util::bytes::BytesMut;
use tokio_util::codec::Decoder;

static OPTIONS: TestFile = TestFile::new("options.txt", include_str!("../resources/response/options.txt"));
static RESPMOD_SMALL: TestFile = TestFile::new("respmod_small.txt", include_str!("../resources/response/respmod_small.txt"));
static RESPMOD_LARGE: TestFile = TestFile::new("respmod_large.txt", include_str!("../resources/response/respmod_large.txt"));

fn create_test_cases() -> Vec<TestCase> {
    vec![
        TestCase::small("options_decoder", OPTIONS),
        TestCase::normal("small_respmod_decoder", RESPMOD_SMALL),
        TestCase::large("large_respmod_decoder", RESPMOD_LARGE),
    ]
}

fn benchmark_response_decoder(criterion: &mut Criterion) {
    let test_cases = create_test_cases();
    let mut group = criterion.benchmark_group("response_decoder");

    for case in test_cases {
        group.throughput(Throughput::Bytes(case.file().len()));
        group.bench_with_input(BenchmarkId::new(case.group().as_str(), case.name()), &case, |b, case| {
            let mut response_decoder = ResponseDecoder::new();
            b.iter_batched_ref(
                || BytesMut::from(case.file().content()),
                |bytes_mut| {
                    let response = response_decoder.decode(bytes_mut).expect("input should be a valid icap response").unwrap();
                    black_box(response);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn benchmark_fragmented_decoder(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("fragmented_response_decoder");
    let content = RESPMOD_LARGE.bytes();

    for fragment in [16, 256, 4096] {
        group.throughput(Throughput::Bytes(RESPMOD_LARGE.len()));
        group.bench_with_input(BenchmarkId::from_parameter(fragment), &fragment, |b, &fragment| {
            b.iter(|| {
                let mut response_decoder = ResponseDecoder::new();
                let mut bytes_mut = BytesMut::new();
                for piece in content.chunks(fragment) {
                    bytes_mut.extend_from_slice(piece);
                    if let Some(response) = response_decoder.decode(&mut bytes_mut).expect("input should be a valid icap response") {
                        black_box(response);
                    }
                }
            });
        });
    }

    group.finish();
}

criterion_group!(decoder, benchmark_response_decoder, benchmark_fragmented_decoder);
criterion_main!(decoder);
