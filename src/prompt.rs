// Prompt template sent as the user message. The model is asked to answer in
// Spanish, in three numbered sections, and to stay short. The length limit is
// only a request in the text; nothing enforces it.

/// Build the instructional prompt for one (library, topic) pair.
pub fn build_prompt(library: &str, topic: &str) -> String {
    format!(
        "**Instrucciones:**
Actúa como un experto asistente en programación de Python. Tu objetivo es proporcionar información detallada y precisa sobre la **librería** y el **tema** que se te solicitan, usando ejemplos de código.

**Parámetros:**
* **Librería:** {library}
* **Tema:** {topic}

**Formato de la respuesta:**
Proporciona la información de la siguiente manera:
1. **Definición del Tema:** Explica qué es, su propósito principal y cuándo se utiliza.
2. **Ejemplo de Uso:** Incluye un ejemplo de código en Python sencillo y funcional.
3. **Consideraciones Importantes:** Menciona buenas prácticas o posibles errores comunes.

Asegúrate de responder en español y de forma clara para un programador intermedio. No incluyas un saludo o despedida en tu respuesta, ve directo al grano y trata en lo posible de no usar mas de 100 token.
"
    )
}
