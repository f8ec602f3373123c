use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use radixsort_rs::common::io::{read_words, write_bytes};
use radixsort_rs::radix::{
    ElementKind, NumericCategory, RadixElement, RadixSorter, SortConfig, UnsupportedPolicy,
    is_radix_sorted,
};

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ElementType {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl ElementType {
    fn kind(self) -> ElementKind {
        match self {
            ElementType::U8 => ElementKind::of::<u8>(),
            ElementType::U16 => ElementKind::of::<u16>(),
            ElementType::U32 => ElementKind::of::<u32>(),
            ElementType::U64 => ElementKind::of::<u64>(),
            ElementType::I8 => ElementKind::of::<i8>(),
            ElementType::I16 => ElementKind::of::<i16>(),
            ElementType::I32 => ElementKind::of::<i32>(),
            ElementType::I64 => ElementKind::of::<i64>(),
            ElementType::F32 => ElementKind::of::<f32>(),
            ElementType::F64 => ElementKind::of::<f64>(),
        }
    }

    /// Typed view of a raw element kind, if one exists.
    fn from_kind(kind: ElementKind) -> Option<Self> {
        ElementType::value_variants()
            .iter()
            .copied()
            .find(|t| t.kind() == kind)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum CategoryArg {
    Unsigned,
    Signed,
    Float,
}

impl From<CategoryArg> for NumericCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Unsigned => NumericCategory::Unsigned,
            CategoryArg::Signed => NumericCategory::Signed,
            CategoryArg::Float => NumericCategory::Float,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "fradix",
    version,
    about = "Time an LSD radix sort on random or file-backed numeric arrays"
)]
struct Cli {
    /// Number of random elements to generate
    #[arg(short = 'n', long = "count", default_value_t = 10_000_000)]
    count: usize,

    /// Element type of the generated or loaded data
    #[arg(short = 't', long = "type", value_enum, default_value_t = ElementType::F64)]
    element_type: ElementType,

    /// Also time the standard library sort on a copy and compare results
    #[arg(long = "time-std-sort")]
    time_std_sort: bool,

    /// Seed for the random generator (default: from OS entropy)
    #[arg(long = "seed", value_name = "N")]
    seed: Option<u64>,

    /// Sort a raw native-endian FILE instead of generating data
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    input: Option<PathBuf>,

    /// Write the sorted raw data to FILE
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Element width of the input file in bytes (overrides --type)
    #[arg(long = "width", value_name = "BYTES", requires_all = ["category", "input"])]
    width: Option<usize>,

    /// Numeric category of the input file (with --width)
    #[arg(long = "category", value_enum, requires = "width")]
    category: Option<CategoryArg>,

    /// Leave unsupported element types unsorted instead of failing
    #[arg(long = "ignore-unsupported")]
    ignore_unsupported: bool,

    /// Check that the result is sorted; exit 1 if it is not
    #[arg(long = "verify")]
    verify: bool,
}

/// Element types the benchmark can generate and sort with the std library.
trait BenchElement: RadixElement {
    fn random(rng: &mut StdRng, count: usize) -> Vec<Self>;
    fn std_sort(data: &mut [Self]);
}

macro_rules! bench_int_impl {
    ($($t:ty)*) => ($(
        impl BenchElement for $t {
            fn random(rng: &mut StdRng, count: usize) -> Vec<Self> {
                (0..count).map(|_| rng.r#gen::<$t>()).collect()
            }

            fn std_sort(data: &mut [Self]) {
                data.sort_unstable();
            }
        }
    )*)
}

bench_int_impl! { u8 u16 u32 u64 i8 i16 i32 i64 }

macro_rules! bench_float_impl {
    ($($t:ty)*) => ($(
        impl BenchElement for $t {
            fn random(rng: &mut StdRng, count: usize) -> Vec<Self> {
                // Half range: a full MIN_POSITIVE..=MAX span overflows Uniform.
                let dist = Uniform::new_inclusive(<$t>::MIN_POSITIVE, <$t>::MAX / 2.0);
                (0..count)
                    .map(|_| {
                        let magnitude = dist.sample(rng);
                        if rng.r#gen::<bool>() { -magnitude } else { magnitude }
                    })
                    .collect()
            }

            fn std_sort(data: &mut [Self]) {
                data.sort_unstable_by(|a, b| a.total_cmp(b));
            }
        }
    )*)
}

bench_float_impl! { f32 f64 }

macro_rules! with_element_type {
    ($ty:expr, $f:ident($($arg:expr),* $(,)?)) => {
        match $ty {
            ElementType::U8 => $f::<u8>($($arg),*),
            ElementType::U16 => $f::<u16>($($arg),*),
            ElementType::U32 => $f::<u32>($($arg),*),
            ElementType::U64 => $f::<u64>($($arg),*),
            ElementType::I8 => $f::<i8>($($arg),*),
            ElementType::I16 => $f::<i16>($($arg),*),
            ElementType::I32 => $f::<i32>($($arg),*),
            ElementType::I64 => $f::<i64>($($arg),*),
            ElementType::F32 => $f::<f32>($($arg),*),
            ElementType::F64 => $f::<f64>($($arg),*),
        }
    };
}

fn report(label: &str, elapsed: Duration, elements: usize) {
    println!(
        "It took the {} {} seconds to sort {} elements.",
        label,
        elapsed.as_secs_f64(),
        elements
    );
}

/// Time the std sort on `baseline` and compare it with the radix result.
fn compare_with_std<T: BenchElement>(mut baseline: Vec<T>, sorted: &[T]) -> bool {
    let start = Instant::now();
    T::std_sort(&mut baseline);
    report("std sort", start.elapsed(), baseline.len());

    let same = bytemuck::cast_slice::<T, u8>(&baseline) == bytemuck::cast_slice::<T, u8>(sorted);
    if !same {
        eprintln!("fradix: radix sort result differs from std sort");
    }
    same
}

fn verify_sorted<T: BenchElement>(sorted: &[T]) -> bool {
    let ok = is_radix_sorted(sorted);
    if !ok {
        eprintln!("fradix: output is not sorted");
    }
    ok
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    write_bytes(path, bytes).with_context(|| format!("cannot write '{}'", path.display()))
}

fn run_random<T: BenchElement>(cli: &Cli, sorter: &mut RadixSorter) -> anyhow::Result<bool> {
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut data = T::random(&mut rng, cli.count);
    let baseline = cli.time_std_sort.then(|| data.clone());

    let start = Instant::now();
    sorter.sort(&mut data)?;
    report("radix_sort", start.elapsed(), data.len());

    let mut ok = true;
    if let Some(baseline) = baseline {
        ok &= compare_with_std(baseline, &data);
    }
    if cli.verify {
        ok &= verify_sorted(&data);
    }
    if let Some(path) = &cli.output {
        write_output(path, bytemuck::cast_slice(&data[..]))?;
    }
    Ok(ok)
}

fn check_file<T: BenchElement>(cli: &Cli, bytes: &[u8], baseline: Option<&[u8]>) -> bool {
    let sorted: &[T] = bytemuck::cast_slice(bytes);
    let mut ok = true;
    if let Some(original) = baseline {
        let copy = bytemuck::cast_slice::<u8, T>(original).to_vec();
        ok &= compare_with_std(copy, sorted);
    }
    if cli.verify {
        ok &= verify_sorted(sorted);
    }
    ok
}

fn run_file(cli: &Cli, sorter: &mut RadixSorter, path: &Path) -> anyhow::Result<bool> {
    let mut buf = read_words(path).with_context(|| format!("cannot read '{}'", path.display()))?;
    let kind = match (cli.width, cli.category) {
        (Some(width), Some(category)) => ElementKind::new(width, category.into()),
        _ => cli.element_type.kind(),
    };
    let typed = ElementType::from_kind(kind).filter(|_| buf.len() % kind.width_bytes == 0);
    // A cloned WordBuffer stays 8-byte aligned, so it can be viewed as any element type.
    let baseline = match typed {
        Some(_) if cli.time_std_sort => Some(buf.clone()),
        _ => None,
    };

    let start = Instant::now();
    sorter
        .sort_bytes(buf.as_bytes_mut(), kind)
        .with_context(|| format!("cannot sort '{}'", path.display()))?;
    let elements = buf.len().checked_div(kind.width_bytes).unwrap_or(0);
    report("radix_sort", start.elapsed(), elements);

    let ok = match typed {
        Some(t) => with_element_type!(
            t,
            check_file(cli, buf.as_bytes(), baseline.as_ref().map(|b| b.as_bytes()))
        ),
        None => {
            if cli.verify || cli.time_std_sort {
                eprintln!(
                    "fradix: cannot check {}-byte {} data",
                    kind.width_bytes, kind.category
                );
            }
            true
        }
    };
    if let Some(out) = &cli.output {
        write_output(out, buf.as_bytes())?;
    }
    Ok(ok)
}

fn run(cli: &Cli) -> anyhow::Result<bool> {
    let unsupported = if cli.ignore_unsupported {
        UnsupportedPolicy::Ignore
    } else {
        UnsupportedPolicy::Error
    };
    let mut sorter = RadixSorter::with_config(SortConfig { unsupported });

    match &cli.input {
        Some(path) => run_file(cli, &mut sorter, path),
        None => with_element_type!(cli.element_type, run_random(cli, &mut sorter)),
    }
}

fn main() {
    radixsort_rs::common::reset_sigpipe();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("fradix: {:#}", e);
            process::exit(2);
        }
    }
}
