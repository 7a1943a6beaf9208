use abacus_core::{DivideSettings, DivisionFormula, OperationSettings, QuestionSettings};
use abacus_generate::{WorksheetEngine, WorksheetOptions};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = QuestionSettings::new(OperationSettings::Divide(DivideSettings::new(
        DivisionFormula::CatEqMice,
    )))
    .with_seed("sample");

    let worksheet = WorksheetEngine::new(WorksheetOptions {
        count: 10,
        unique: true,
        ..WorksheetOptions::default()
    })
    .run(&settings)?;

    println!("worksheet {} (seed {})", worksheet.id, worksheet.seed);
    for (index, question) in worksheet.questions.iter().enumerate() {
        println!("{:>2}. {question}", index + 1);
    }
    Ok(())
}
