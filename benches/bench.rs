// Criterion benchmarks for the bursary matching engine

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use bursary_match::core::{calculate_compatibility, shortlist_students, Matcher};
use bursary_match::models::{
    Donor, DonorFeatures, DonorType, ScoringWeights, Student, StudentFeatures,
};
use chrono::Utc;
use rust_decimal::Decimal;

fn create_student(id: usize) -> Student {
    let courses = ["Engineering", "Commerce", "ICT", "Health", "Law"];
    Student {
        id: id as i64,
        student_number: format!("ST{:05}", id),
        first_name: "Student".to_string(),
        last_name: format!("Number {}", id),
        gpa: (id % 41) as f64 / 10.0,
        course: Some(courses[id % courses.len()].to_string()),
        need_score: (id % 101) as f64,
        province: None,
        created_at: Utc::now(),
    }
}

fn create_donor(id: usize) -> Donor {
    let preferences = ["Any", "Engineering", "Commerce", "eng, ict", "Health"];
    let types = [DonorType::Alumni, DonorType::Corporate, DonorType::Ngo];
    Donor {
        id: id as i64,
        name: format!("Donor {}", id),
        donor_type: types[id % types.len()],
        preferred_course: Some(preferences[id % preferences.len()].to_string()),
        min_gpa: (id % 5) as f64 * 0.8,
        max_amount: Decimal::new(500000, 2),
        created_at: Utc::now(),
    }
}

fn bench_score_pair(c: &mut Criterion) {
    let student = StudentFeatures::new(3.6, Some("Engineering"), 80.0);
    let donor = DonorFeatures::new(3.0, Some("eng"), DonorType::Alumni, Decimal::new(500000, 2));
    let weights = ScoringWeights::default();

    c.bench_function("score_pair", |b| {
        b.iter(|| calculate_compatibility(black_box(&student), black_box(&donor), black_box(&weights)));
    });
}

fn bench_generate_all(c: &mut Criterion) {
    let matcher = Matcher::with_defaults();

    let mut group = c.benchmark_group("generate_all");

    for population in [10, 50, 100, 250].iter() {
        let students: Vec<Student> = (0..*population).map(create_student).collect();
        let donors: Vec<Donor> = (0..*population).map(create_donor).collect();

        group.bench_with_input(
            BenchmarkId::new("cross_product", population),
            population,
            |b, _| {
                b.iter(|| matcher.generate_all(black_box(&students), black_box(&donors)));
            },
        );
    }

    group.finish();
}

fn bench_rescore_student(c: &mut Criterion) {
    let matcher = Matcher::with_defaults();
    let student = create_student(1);
    let donors: Vec<Donor> = (0..500).map(create_donor).collect();

    c.bench_function("rescore_student_500_donors", |b| {
        b.iter(|| matcher.rescore_student(black_box(&student), black_box(&donors)));
    });
}

fn bench_shortlist(c: &mut Criterion) {
    let donor = create_donor(3);
    let students: Vec<Student> = (0..1000).map(create_student).collect();

    c.bench_function("shortlist_1000_students", |b| {
        b.iter(|| shortlist_students(black_box(&donor), black_box(students.clone()), black_box(5)));
    });
}

criterion_group!(
    benches,
    bench_score_pair,
    bench_generate_all,
    bench_rescore_student,
    bench_shortlist
);

criterion_main!(benches);
