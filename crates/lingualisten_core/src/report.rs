//! crates/lingualisten_core/src/report.rs
//!
//! Joins raw answer records with question text into a human-readable
//! results report, and renders the Spanish-language email/SMS bodies.

use crate::domain::{Assessment, Question};

/// Shown when a question id in an assessment no longer resolves.
/// The report degrades instead of failing; submission-time scoring is
/// where a missing question is a hard error.
pub const MISSING_QUESTION_PLACEHOLDER: &str = "(pregunta no disponible)";

/// One answered question, resolved to display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub question_text: String,
    pub selected_option_text: String,
    pub correct_option_text: String,
    pub is_correct: bool,
}

/// A complete per-question breakdown of one assessment.
#[derive(Debug, Clone)]
pub struct ResultsReport {
    pub user_name: String,
    pub topic_prompt: String,
    pub score: u32,
    pub total_questions: u32,
    pub lines: Vec<ReportLine>,
}

impl ResultsReport {
    pub fn percent_score(&self) -> u32 {
        if self.total_questions == 0 {
            return 0;
        }
        (self.score * 100 + self.total_questions / 2) / self.total_questions
    }
}

/// Builds the report for one assessment. A pure read; safe to repeat.
pub fn build_report(assessment: &Assessment, topic_prompt: &str, questions: &[Question]) -> ResultsReport {
    let lines = assessment
        .answers
        .iter()
        .map(|answer| {
            let question = questions.iter().find(|q| q.id == answer.question_id);
            match question {
                Some(q) => ReportLine {
                    question_text: q.question.clone(),
                    selected_option_text: option_text(q, answer.selected_option),
                    correct_option_text: option_text(q, q.correct_option),
                    is_correct: answer.is_correct,
                },
                None => ReportLine {
                    question_text: MISSING_QUESTION_PLACEHOLDER.to_string(),
                    selected_option_text: MISSING_QUESTION_PLACEHOLDER.to_string(),
                    correct_option_text: MISSING_QUESTION_PLACEHOLDER.to_string(),
                    is_correct: answer.is_correct,
                },
            }
        })
        .collect();

    ResultsReport {
        user_name: assessment.user_name.clone(),
        topic_prompt: topic_prompt.to_string(),
        score: assessment.score,
        total_questions: assessment.total_questions,
        lines,
    }
}

fn option_text(question: &Question, index: usize) -> String {
    question
        .options
        .get(index)
        .cloned()
        .unwrap_or_else(|| MISSING_QUESTION_PLACEHOLDER.to_string())
}

//=========================================================================================
// Delivery Bodies
//=========================================================================================

/// The subject line for the results email.
pub fn email_subject(report: &ResultsReport) -> String {
    format!(
        "Tu Reporte de LinguaListen - {}/{} Preguntas Correctas",
        report.score, report.total_questions
    )
}

/// Renders the HTML body for the results email.
pub fn render_email_html(report: &ResultsReport) -> String {
    let answers_html: String = report
        .lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let icon = if line.is_correct { "✅" } else { "❌" };
            let color = if line.is_correct { "#10b981" } else { "#ef4444" };
            let correction = if line.is_correct {
                String::new()
            } else {
                format!(
                    "<p style=\"color: #6b7280; margin-left: 28px;\">Respuesta correcta: {}</p>",
                    line.correct_option_text
                )
            };
            format!(
                "<div style=\"margin-bottom: 15px; border-bottom: 1px solid #e5e7eb; padding-bottom: 15px;\">\
                 <p style=\"font-weight: 500;\">{}. {}</p>\
                 <p style=\"color: {};\">{} Tu respuesta: {}</p>{}</div>",
                i + 1,
                line.question_text,
                color,
                icon,
                line.selected_option_text,
                correction
            )
        })
        .collect();

    format!(
        "<!DOCTYPE html>\
         <html><body style=\"font-family: system-ui, sans-serif; line-height: 1.5; color: #1f2937;\">\
         <div style=\"max-width: 600px; margin: 0 auto; padding: 20px;\">\
         <h1 style=\"color: #0f766e; text-align: center;\">LinguaListen</h1>\
         <p style=\"text-align: center;\">Reporte de Comprensión Auditiva en Inglés</p>\
         <p>Hola {},</p>\
         <p>Aquí está tu reporte de evaluación para el tema: <strong>{}</strong></p>\
         <h2>Resumen de Puntuación</h2>\
         <p style=\"font-size: 20px; font-weight: bold; color: #0f766e;\">{}/{} ({}%)</p>\
         <h2>Detalle de Respuestas</h2>{}\
         <p>Sigue practicando para mejorar tu comprensión auditiva en inglés. ¡Puedes hacerlo!</p>\
         <p>El equipo de LinguaListen</p>\
         </div></body></html>",
        report.user_name,
        report.topic_prompt,
        report.score,
        report.total_questions,
        report.percent_score(),
        answers_html
    )
}

/// Renders the plain-text body for the results SMS.
pub fn render_sms_text(report: &ResultsReport) -> String {
    format!(
        "LinguaListen - Reporte de Evaluación\n\n\
         Hola {},\n\n\
         Tu puntuación: {}/{} ({}%)\n\
         Tema: {}\n\n\
         ¡Gracias por practicar con LinguaListen! Visita nuestra aplicación para ver un reporte detallado.",
        report.user_name,
        report.score,
        report.total_questions,
        report.percent_score(),
        report.topic_prompt
    )
}
